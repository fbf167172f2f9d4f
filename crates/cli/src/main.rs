//! CLI tool for exporting fragment-annotated documents as reveal.js slides.

use anyhow::{Context, Result};
use clap::Parser;
use reveal_core::effect::KNOWN_EFFECTS;
use reveal_core::reveal::ordered_fragments;
use reveal_core::{render_slide, Delta, I18nConfig, RevealConfig, RevealExporter, Translator};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Export Delta JSON documents with fragments as a reveal.js presentation.
#[derive(Parser, Debug)]
#[command(name = "reveal-export")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input documents as Delta JSON, one slide per file
    #[arg(required_unless_present = "list_effects")]
    input: Vec<PathBuf>,

    /// Output file (default: presentation.html next to the first input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Presentation settings as JSON (version, theme, transition, hash)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// reveal.js theme name
    #[arg(long)]
    theme: Option<String>,

    /// Slide transition
    #[arg(long)]
    transition: Option<String>,

    /// Output only the slide sections, without the HTML document
    #[arg(long)]
    body_only: bool,

    /// List each slide's fragments in reveal order
    #[arg(short, long)]
    fragments: bool,

    /// List the known fragment effects and exit
    #[arg(long)]
    list_effects: bool,

    /// Language for effect labels
    #[arg(short = 'L', long, default_value = "en")]
    language: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if args.list_effects {
        let translator = Translator::new(I18nConfig {
            language: args.language.clone(),
            ..I18nConfig::default()
        });
        print!("{}", effect_listing(&translator));
        return Ok(());
    }

    let exporter = build_exporter(&args)?;
    let mut slides = Vec::new();

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match load_document(input_path) {
            Ok(delta) => {
                if args.fragments {
                    eprint!("{}", fragment_listing(slides.len() + 1, &delta));
                }
                slides.push(render_slide(&delta.ops, delta.title.as_deref()));
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    if slides.is_empty() {
        anyhow::bail!("No slides could be rendered");
    }

    let output = if args.body_only {
        format!("{}\n", slides.join("\n"))
    } else {
        format!("{}\n", exporter.render_presentation(&slides))
    };

    if args.print {
        print!("{}", output);
    } else {
        let output_path = get_output_path(&args.input[0], args.output.as_ref());
        write_output(&output_path, &output)?;
        if args.verbose {
            eprintln!("Written {} slides to: {}", slides.len(), output_path.display());
        }
    }

    Ok(())
}

/// Build the exporter from the config file and command-line overrides.
fn build_exporter(args: &Args) -> Result<RevealExporter> {
    let config = match &args.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            serde_json::from_reader::<_, RevealConfig>(BufReader::new(file))
                .with_context(|| format!("Invalid presentation config {}", path.display()))?
        }
        None => RevealConfig::default(),
    };

    let mut exporter = RevealExporter::with_config(config);
    if let Some(theme) = &args.theme {
        exporter = exporter.with_theme(theme.as_str());
    }
    if let Some(transition) = &args.transition {
        exporter = exporter.with_transition(transition.as_str());
    }

    Ok(exporter)
}

/// Read one slide document.
fn load_document(path: &Path) -> Result<Delta> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let delta = Delta::from_json(&content).with_context(|| "Failed to parse Delta JSON")?;

    log::debug!(
        "Loaded {} operations ({} fragments) from {}",
        delta.ops.len(),
        delta.fragments().len(),
        path.display()
    );
    Ok(delta)
}

/// One line per fragment, in reveal order.
fn fragment_listing(slide_number: usize, delta: &Delta) -> String {
    let mut listing = String::new();
    for fragment in ordered_fragments(&delta.ops) {
        let index = fragment
            .index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".to_string());
        listing.push_str(&format!(
            "slide {} [{}] {}: {}\n",
            slide_number, index, fragment.effect, fragment.text
        ));
    }
    listing
}

/// One line per known effect with its localized label.
fn effect_listing(translator: &Translator) -> String {
    KNOWN_EFFECTS
        .iter()
        .map(|effect| format!("{}\t{}\n", effect.name, translator.effect_label(effect.name)))
        .collect()
}

/// Determine the output path.
fn get_output_path(first_input: &Path, output: Option<&PathBuf>) -> PathBuf {
    match output {
        Some(path) => path.clone(),
        None => match first_input.parent() {
            Some(parent) => parent.join("presentation.html"),
            None => PathBuf::from("presentation.html"),
        },
    }
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::{FragmentAnnotation, Operation};

    #[test]
    fn test_fragment_listing() {
        let delta = Delta::new(vec![
            Operation::fragment(FragmentAnnotation::new("a", "later", "", None)),
            Operation::fragment(FragmentAnnotation::new("b", "first", "grow", Some(1))),
        ]);

        assert_eq!(
            fragment_listing(2, &delta),
            "slide 2 [1] grow: first\nslide 2 [-] fade-in: later\n"
        );
    }

    #[test]
    fn test_effect_listing() {
        let listing = effect_listing(&Translator::from_locale("es"));
        assert!(listing.starts_with("fade-in\tFade In (predeterminado)\n"));
        assert!(listing.contains("strike\tStrike\n"));
    }

    #[test]
    fn test_get_output_path() {
        assert_eq!(
            get_output_path(Path::new("talk/slide1.json"), None),
            PathBuf::from("talk/presentation.html")
        );
        let explicit = PathBuf::from("out/deck.html");
        assert_eq!(
            get_output_path(Path::new("slide1.json"), Some(&explicit)),
            explicit
        );
    }

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["reveal-export", "a.json", "b.json", "--theme", "night", "-p"]);
        assert_eq!(args.input.len(), 2);
        assert!(args.print);

        let exporter = build_exporter(&args).unwrap();
        assert_eq!(exporter.config().theme, "night");
        assert_eq!(exporter.config().transition, "slide");

        let args = Args::parse_from(["reveal-export", "--list-effects", "-L", "de"]);
        assert!(args.list_effects);
        assert!(args.input.is_empty());
    }
}
