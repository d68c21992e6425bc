//! `brandkit` - Renders a logo PNG from a saved profile or command-line flags.

use std::path::PathBuf;

use clap::Parser;

use brandkit_renderer::{
    BrandProfile, ExportScale, FontFamily, FontLibrary, MemoryStore, Result, StudioSession, Theme,
};

/// Command-line arguments for `brandkit`.
#[derive(Parser, Debug)]
#[command(
    name = "brandkit",
    about = "Compose a brand logo and export it as PNG",
    version
)]
struct Cli {
    /// Profile JSON file to start from (flags below override it)
    #[arg(short, long, value_name = "FILE")]
    profile: Option<PathBuf>,

    /// First name segment
    #[arg(long)]
    name1: Option<String>,

    /// Second name segment
    #[arg(long)]
    name2: Option<String>,

    /// Subtitle (truncated to 15 characters)
    #[arg(long)]
    subtitle: Option<String>,

    /// Accent color as #rrggbb
    #[arg(long, value_name = "HEX")]
    color: Option<String>,

    /// Registry icon key (unknown keys fall back to the default icon)
    #[arg(long, value_name = "KEY")]
    icon: Option<String>,

    /// Font family key (montserrat, poppins, orbitron, bebas-neue, archivo-black)
    #[arg(long, value_name = "KEY")]
    font: Option<String>,

    /// TTF/OTF file registered for the chosen family; repeatable as key=path
    #[arg(long = "font-file", value_name = "KEY=PATH")]
    font_files: Vec<String>,

    /// Theme: dark (default) or light
    #[arg(long)]
    theme: Option<String>,

    /// Export size: sm, md, lg or xl
    #[arg(long, value_name = "SIZE")]
    size: Option<String>,

    /// Hide the "+" separator between the name segments
    #[arg(long, action)]
    no_separator: bool,

    /// Output file name (without extension); synthesized when omitted
    #[arg(short = 'o', long, value_name = "NAME")]
    out_name: Option<String>,

    /// Directory the PNG is written into
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
}

fn parse_scale(s: &str) -> ExportScale {
    match s {
        "sm" => ExportScale::Sm,
        "lg" => ExportScale::Lg,
        "xl" => ExportScale::Xl,
        _ => ExportScale::Md,
    }
}

fn load_fonts(specs: &[String]) -> Result<FontLibrary> {
    let mut fonts = FontLibrary::new();
    for spec in specs {
        let Some((key, path)) = spec.split_once('=') else {
            log::warn!("ignoring malformed --font-file {spec}; expected key=path");
            continue;
        };
        fonts.register(FontFamily::from_key(key), std::fs::read(path)?)?;
    }
    Ok(fonts)
}

fn run(cli: Cli) -> Result<()> {
    let mut session = StudioSession::new(
        load_fonts(&cli.font_files)?,
        Box::new(MemoryStore::new()),
    );

    let mut out_name = cli.out_name.unwrap_or_default();
    if let Some(path) = &cli.profile {
        let profile = BrandProfile::from_json(&std::fs::read_to_string(path)?)?;
        profile.apply(&mut session);
        if out_name.is_empty() {
            out_name = profile.custom_filename().to_string();
        }
    }

    if let Some(name) = &cli.name1 {
        session.set_name1(name);
    }
    if let Some(name) = &cli.name2 {
        session.set_name2(name);
    }
    if let Some(subtitle) = &cli.subtitle {
        session.set_subtitle(subtitle);
    }
    if let Some(color) = &cli.color {
        session.set_accent_color(color)?;
    }
    if let Some(icon) = &cli.icon {
        session.set_icon_key(icon);
    }
    if let Some(font) = &cli.font {
        session.set_font_key(font);
    }
    if let Some(theme) = &cli.theme {
        session.set_theme(if theme.eq_ignore_ascii_case("light") {
            Theme::Light
        } else {
            Theme::Dark
        });
    }
    if let Some(size) = &cli.size {
        session.set_export_scale(parse_scale(size));
    }
    if cli.no_separator {
        session.set_show_separator(false);
    }

    let artifact = session.export_logo(&out_name)?;
    let path = artifact.save_to_dir(&cli.out_dir)?;
    log::info!("wrote {}", path.display());
    println!("{}", path.display());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
