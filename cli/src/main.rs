use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use clap::{ArgAction, Parser};
use serde::Serialize;
use serde_json::Value;
use serde_tone::{DecodeOptions, Delimiter, EncodeOptions, Indent};
use tiktoken_rs::cl100k_base;

#[derive(Parser, Debug)]
#[command(name = "tone", version, about = "TONE encoder/decoder")]
struct Args {
    /// Input file path (.json, .tone, or .toon). Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Force encode mode (overrides auto-detection).
    #[arg(short = 'e', long)]
    encode: bool,

    /// Force decode mode (overrides auto-detection).
    #[arg(short = 'd', long)]
    decode: bool,

    /// Array delimiter: , (comma), \t (tab), | (pipe).
    #[arg(long, value_name = "char", value_parser = parse_delimiter)]
    delimiter: Option<Delimiter>,

    /// Indentation step in spaces (default: 2).
    #[arg(long, value_name = "number", default_value_t = 2)]
    indent: usize,

    /// Render array lengths as [#N] instead of [N].
    #[arg(long = "length-marker")]
    length_marker: bool,

    /// Disable strict validation when decoding.
    #[arg(long = "no-strict", action = ArgAction::SetFalse, default_value_t = true)]
    strict: bool,

    /// Show token statistics after encoding.
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
enum InputSource {
    Stdin,
    File(String),
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let (input_text, input_source) = read_input(args.input.as_deref())?;
    let mode = resolve_mode(&args, &input_source)?;

    match mode {
        Mode::Encode => run_encode(&args, &input_text, &input_source),
        Mode::Decode => run_decode(&args, &input_text, &input_source),
    }
}

fn run_encode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let value: Value = serde_json::from_str(input)?;
    let mut options = EncodeOptions::new()
        .with_indent(Indent::spaces(args.indent))
        .with_length_marker(args.length_marker);
    if let Some(delimiter) = args.delimiter {
        options = options.with_delimiter(delimiter);
    }

    let text = serde_tone::encode(&value, &options)?;
    write_output(args.output.as_deref(), text.as_bytes())?;
    if let Some(path) = output_path(args) {
        report_status(Mode::Encode, input_source, path);
    }
    if args.stats {
        print_stats(&value, &text)?;
    }
    Ok(())
}

fn run_decode(args: &Args, input: &str, input_source: &InputSource) -> Result<(), Box<dyn Error>> {
    let options = DecodeOptions::new()
        .with_indent(Indent::spaces(args.indent))
        .with_strict(args.strict);

    let value = serde_tone::decode(input, &options)?;
    with_output_writer(args.output.as_deref(), |writer| {
        write_json(writer, &value, args.indent)
    })?;
    if let Some(path) = output_path(args) {
        report_status(Mode::Decode, input_source, path);
    }
    Ok(())
}

fn output_path(args: &Args) -> Option<&str> {
    match args.output.as_deref() {
        Some(path) if path != "-" => Some(path),
        _ => None,
    }
}

fn resolve_mode(args: &Args, input_source: &InputSource) -> Result<Mode, Box<dyn Error>> {
    if args.encode {
        return Ok(Mode::Encode);
    }
    if args.decode {
        return Ok(Mode::Decode);
    }

    match input_source {
        InputSource::Stdin => Ok(Mode::Encode),
        InputSource::File(path) => match Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Mode::Encode),
            Some("tone") | Some("toon") => Ok(Mode::Decode),
            _ => Err("unable to auto-detect mode; use --encode or --decode".into()),
        },
    }
}

fn read_input(input: Option<&str>) -> Result<(String, InputSource), Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok((buf, InputSource::Stdin))
        }
        Some(path) => {
            let buf = fs::read_to_string(path)?;
            Ok((buf, InputSource::File(path.to_string())))
        }
    }
}

fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    match raw {
        "," => Ok(Delimiter::Comma),
        "|" => Ok(Delimiter::Pipe),
        "\t" | "\\t" => Ok(Delimiter::Tab),
        _ => Err(format!(
            "invalid delimiter \"{raw}\"; valid delimiters are comma (,), tab (\\t), pipe (|)"
        )),
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

fn write_output(path: Option<&str>, data: &[u8]) -> Result<(), Box<dyn Error>> {
    with_output_writer(path, |writer| {
        writer.write_all(data)?;
        Ok(())
    })
}

fn write_json(writer: &mut dyn Write, value: &Value, indent: usize) -> Result<(), Box<dyn Error>> {
    if indent == 0 {
        serde_json::to_writer(&mut *writer, value)?;
    } else {
        let indent_bytes = vec![b' '; indent];
        let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
        let mut serializer = serde_json::Serializer::with_formatter(&mut *writer, formatter);
        value.serialize(&mut serializer)?;
    }
    writer.write_all(b"\n")?;
    Ok(())
}

fn report_status(mode: Mode, input_source: &InputSource, output_path: &str) {
    let input_label = match input_source {
        InputSource::Stdin => "stdin",
        InputSource::File(path) => path.as_str(),
    };
    let verb = match mode {
        Mode::Encode => "encoded",
        Mode::Decode => "decoded",
    };
    println!("{verb} {input_label} -> {output_path}");
}

fn print_stats(value: &Value, text: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string(value)?;
    let bpe = cl100k_base()?;
    let json_tokens = count_tokens(&bpe, &json);
    let tone_tokens = count_tokens(&bpe, text);
    let saved = json_tokens as isize - tone_tokens as isize;
    let pct = if json_tokens > 0 {
        (saved as f64 / json_tokens as f64) * 100.0
    } else {
        0.0
    };

    println!("token estimates: ~{json_tokens} (JSON) -> ~{tone_tokens} (TONE)");
    println!("saved ~{saved} tokens ({pct:.1}%)");
    Ok(())
}

fn count_tokens(bpe: &tiktoken_rs::CoreBPE, text: &str) -> usize {
    bpe.encode_with_special_tokens(text).len()
}
