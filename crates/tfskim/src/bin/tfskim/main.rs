mod cli;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("TFSKIM_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = match cli.command {
        cli::Command::Extract(extract_cli) => extract(extract_cli),
        cli::Command::Dev(dev_cli) => dev(dev_cli),
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

pub fn extract(cli: cli::ExtractCommand) -> anyhow::Result<()> {
    let loader = load(&cli.input)?;
    let (config, diagnostics) = loader.finish();

    if !diagnostics.is_empty() {
        tracing::warn!(count = diagnostics.len(), "finished with warnings");
    }

    output(&cli.output, &config)?;
    Ok(())
}

fn load(input: &cli::InputArgs) -> anyhow::Result<tfskim::loader::Loader> {
    let mut loader = tfskim::loader::Loader::new();

    if input.files.is_empty() && input.directories.is_empty() {
        loader.load_directory(&std::env::current_dir()?)?;
        return Ok(loader);
    }

    for dir_path in &input.directories {
        loader.load_directory(dir_path)?;
    }

    for file_path in &input.files {
        loader.load_file(file_path)?;
    }

    Ok(loader)
}

fn output(output: &cli::OutputArgs, config: &tfskim::config::Config) -> anyhow::Result<()> {
    match output.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), config)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), config)?,
    };

    Ok(())
}

/// (tfskim-)developer utilities
///
/// A quick way to expose internal structures for debugging purposes
pub fn dev(cli: cli::DevCommand) -> anyhow::Result<()> {
    use cli::DevSubCommand::*;

    let mut loader = tfskim::loader::Loader::new();
    loader.load_directory(&std::env::current_dir()?)?;

    match cli.command {
        Model => println!("{:#?}", loader.config()),
        Warnings => println!("{:#?}", loader.diagnostics()),
    }

    Ok(())
}
