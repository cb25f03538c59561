//! `zenglyph`: decode a BMP font sheet, optionally re-encode it, and dump
//! one glyph cell as ASCII art.

use std::path::PathBuf;
use std::process::exit;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use log::{Level, error, info};

use zenglyph::{
    BitmapError, CellGeometry, EncodeRequest, GlyphSheet, Limits, Permissiveness, Unstoppable,
    render_cell,
};

#[rustfmt::skip]
fn create_cmd_args() -> Command {
    Command::new("zenglyph")
        .about("Inspect glyphs of a BMP bitmap-font sheet")
        .arg(Arg::new("in")
            .short('i')
            .long("input")
            .help("BMP file to read")
            .value_parser(value_parser!(PathBuf))
            .required(true))
        .arg(Arg::new("out")
            .short('o')
            .long("output")
            .help("Re-encode the decoded image to this BMP file")
            .value_parser(value_parser!(PathBuf)))
        .arg(Arg::new("cell-width")
            .long("cell-width")
            .help_heading("GLYPHS")
            .help("Width of one glyph cell in pixels")
            .value_parser(value_parser!(u32).range(1..))
            .default_value("32"))
        .arg(Arg::new("cell-height")
            .long("cell-height")
            .help_heading("GLYPHS")
            .help("Height of one glyph cell in pixels")
            .value_parser(value_parser!(u32).range(1..))
            .default_value("32"))
        .arg(Arg::new("char")
            .long("char")
            .help_heading("GLYPHS")
            .help("Character whose cell to dump")
            .value_parser(value_parser!(char))
            .default_value("!")
            .conflicts_with("cell"))
        .arg(Arg::new("first-char")
            .long("first-char")
            .help_heading("GLYPHS")
            .help("Character held by the first cell of the sheet")
            .value_parser(value_parser!(char))
            .default_value(" "))
        .arg(Arg::new("cell")
            .long("cell")
            .help_heading("GLYPHS")
            .help("Dump the cell at column X, row Y instead of looking up a character")
            .value_names(["X", "Y"])
            .num_args(2)
            .value_parser(value_parser!(u32)))
        .arg(Arg::new("strict")
            .long("strict")
            .action(ArgAction::SetTrue)
            .help_heading("DECODING")
            .help("Reject files with inconsistent size or resolution fields"))
        .arg(Arg::new("max-width")
            .long("max-width")
            .help_heading("DECODING")
            .help("Refuse images wider than this")
            .value_parser(value_parser!(u64)))
        .arg(Arg::new("max-height")
            .long("max-height")
            .help_heading("DECODING")
            .help("Refuse images taller than this")
            .value_parser(value_parser!(u64)))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display information about the decoding options"))
}

/// Set up logging options
fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("info") {
        Level::Info
    } else {
        Level::Warn
    };

    if let Err(e) = simple_logger::init_with_level(log_level) {
        eprintln!("could not initialize logger: {e}");
    }
    info!("Log level: {log_level}");
}

fn run(options: &ArgMatches) -> Result<(), BitmapError> {
    let input = options
        .get_one::<PathBuf>("in")
        .expect("input is a required argument");

    let limits = Limits {
        max_width: options.get_one::<u64>("max-width").copied(),
        max_height: options.get_one::<u64>("max-height").copied(),
        ..Default::default()
    };
    let permissiveness = if options.get_flag("strict") {
        Permissiveness::Strict
    } else {
        Permissiveness::Standard
    };

    let image = zenglyph::read_bmp_with(input, Some(&limits), permissiveness, Unstoppable)?;
    info!(
        "{}: {}x{}, {} bytes per pixel",
        input.display(),
        image.width,
        image.height,
        image.bytes_per_pixel()
    );

    if let Some(output) = options.get_one::<PathBuf>("out") {
        EncodeRequest::bmp().write_to(&image, output, Unstoppable)?;
        info!("wrote {}", output.display());
    }

    let geometry = CellGeometry::new(
        options.get_one::<u32>("cell-width").copied().unwrap_or(32),
        options.get_one::<u32>("cell-height").copied().unwrap_or(32),
    );

    let text = match options.get_many::<u32>("cell") {
        Some(mut xy) => {
            let (x, y) = (xy.next().copied().unwrap_or(0), xy.next().copied().unwrap_or(0));
            println!("cell: ({x}, {y})");
            render_cell(&image, geometry, x, y)?
        }
        None => {
            let first_char = options.get_one::<char>("first-char").copied().unwrap_or(' ');
            let ch = options.get_one::<char>("char").copied().unwrap_or('!');
            let sheet = GlyphSheet::new(&image, geometry).with_first_char(first_char);
            if options.value_source("char") == Some(ValueSource::DefaultValue) {
                info!("no --char given, dumping {ch:?}");
            }
            println!("char: {ch}");
            sheet.render_char(ch)?
        }
    };
    print!("{text}");
    Ok(())
}

fn main() {
    let options = create_cmd_args().get_matches();

    setup_logger(&options);

    if let Err(e) = run(&options) {
        error!("Could not inspect glyph ({:?} error): {e}", e.kind());
        exit(1);
    }
}
