use anyhow::{Context, Result};
use markdown_notebook_config::Config;
use markdown_notebook_engine::{
    CachedSnippetSource, DirectorySnippetSource, GITHUB_RAW_URL, GithubSnippetSource, LineSource,
    Notebook, SnippetSource, convert,
};
use std::{
    env,
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process,
};

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: String,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    /// Print the plain cell records instead of an `.ipynb` document.
    cells_only: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut input = None;
    let mut parsed = Args::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = args.next().context("-o needs an output path")?;
                parsed.output = Some(PathBuf::from(path));
            }
            "-c" | "--config" => {
                let path = args.next().context("-c needs a config path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--cells" => parsed.cells_only = true,
            flag if flag.starts_with('-') && flag != "-" => {
                anyhow::bail!("unknown option '{flag}'")
            }
            _ if input.is_some() => anyhow::bail!("unexpected argument '{arg}'"),
            _ => input = Some(arg),
        }
    }

    parsed.input = input.context("missing input file")?;
    Ok(parsed)
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let loaded = match explicit {
        Some(path) => match Config::load_from_path(path)? {
            Some(config) => Some(config),
            None => anyhow::bail!("config file '{}' does not exist", path.display()),
        },
        None => Config::load()?,
    };
    Ok(loaded.unwrap_or_else(|| {
        log::debug!(
            "no config file at {}, using defaults",
            Config::config_path().display()
        );
        Config::default()
    }))
}

fn snippet_source(config: &Config) -> Result<Box<dyn SnippetSource>> {
    Ok(match &config.samples_dir {
        Some(dir) => {
            log::info!("reading samples from {}", dir.display());
            Box::new(CachedSnippetSource::new(DirectorySnippetSource::new(dir)))
        }
        None => {
            let base_url = config.samples_url.as_deref().unwrap_or(GITHUB_RAW_URL);
            log::debug!("downloading samples from {base_url}");
            Box::new(CachedSnippetSource::new(GithubSnippetSource::with_base_url(
                base_url,
            )?))
        }
    })
}

fn write_notebook<W: Write>(notebook: &Notebook, cells_only: bool, mut out: W) -> Result<()> {
    if cells_only {
        serde_json::to_writer_pretty(&mut out, notebook)?;
        writeln!(out)?;
    } else {
        notebook.write_ipynb(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let source = LineSource::from_arg(&args.input);

    // Imports resolve against the input's directory, or the working directory for stdin
    let base_dir = match &source {
        LineSource::File(path) => path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        _ => PathBuf::from("."),
    };
    let options = config.pipeline_options(&base_dir);
    let snippets = snippet_source(&config)?;

    let notebook = convert(&source, &options, snippets.as_ref())
        .with_context(|| format!("failed to convert '{}'", args.input))?;
    log::info!(
        "converted '{}' into {} cell(s)",
        args.input,
        notebook.cells.len()
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            write_notebook(&notebook, args.cells_only, BufWriter::new(file))?;
            log::info!("wrote {}", path.display());
        }
        None => write_notebook(&notebook, args.cells_only, io::stdout().lock())?,
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "markdown-notebook".to_string());

    let args = match parse_args(argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program} <input.md|-> [-o output.ipynb] [-c config.toml] [--cells]");
            eprintln!(
                "Without -c, {} is used when present",
                Config::config_path().display()
            );
            process::exit(1);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use markdown_notebook_engine::Cell;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Args> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn input_only() {
        let args = parse(&["doc.md"]).unwrap();
        assert_eq!(
            args,
            Args {
                input: "doc.md".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn options_in_any_order() {
        let args = parse(&["-c", "nb.toml", "-", "--output", "out.ipynb", "--cells"]).unwrap();
        assert_eq!(
            args,
            Args {
                input: "-".into(),
                output: Some(PathBuf::from("out.ipynb")),
                config: Some(PathBuf::from("nb.toml")),
                cells_only: true,
            }
        );
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["a.md", "b.md"]).is_err());
        assert!(parse(&["a.md", "-o"]).is_err());
        assert!(parse(&["a.md", "--verbose"]).is_err());
    }

    #[test]
    fn default_output_is_ipynb() {
        let notebook = Notebook::new(vec![Cell::markdown("# Hi", "hi")], None, "python3");
        let mut out = Vec::new();

        write_notebook(&notebook, false, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["nbformat"], 4);
        assert_eq!(json["cells"][0]["cell_type"], "markdown");
        assert_eq!(json["metadata"]["colab"]["name"], "Hi");
    }

    #[test]
    fn cells_flag_prints_records() {
        let notebook = Notebook::new(vec![Cell::markdown("# Hi", "hi")], None, "python3");
        let mut out = Vec::new();

        write_notebook(&notebook, true, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["cells"][0]["kind"], "markdown");
        assert!(json.get("nbformat").is_none());
    }
}
