use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

use abajiang_lib::api::commands::screen::ScreenController;
use abajiang_lib::api::commands::settings::{set_baidu_credentials, settings_path, show_settings};
use abajiang_lib::core::background::BackgroundStore;
use abajiang_lib::core::features::translator::TranslatorService;
use abajiang_lib::shared::error::AppResult;
use abajiang_lib::shared::settings::AppSettings;
use abajiang_lib::shared::types::{ProviderKind, LANGUAGES};
use abajiang_lib::{logging, open_screen};

#[derive(Parser, Debug)]
#[command(name = "abajiang")]
#[command(about = "Translate text over a custom background", long_about = None)]
struct Args {
    /// Translation provider (overrides settings)
    #[arg(short, long, value_name = "PROVIDER")]
    provider: Option<ProviderKind>,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Translate text once and print the result
    Translate {
        /// Source language code (defaults to settings)
        #[arg(short, long, value_name = "CODE")]
        from: Option<String>,
        /// Target language code (defaults to settings)
        #[arg(short, long, value_name = "CODE")]
        to: Option<String>,
        /// Text to translate
        #[arg(value_name = "TEXT", num_args = 0..)]
        text: Vec<String>,
    },

    /// Manage the saved background image
    #[command(subcommand)]
    Background(BackgroundCommand),

    /// List selectable languages
    Languages,

    /// Inspect or update settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Interactive translator screen
    Shell,
}

#[derive(clap::Subcommand, Debug)]
enum BackgroundCommand {
    /// Use an image (path or file:// URI) as the background
    Set {
        #[arg(value_name = "URI")]
        uri: String,
    },
    /// Show the saved background
    Show,
    /// Forget the saved background
    Clear,
}

#[derive(clap::Subcommand, Debug)]
enum ConfigCommand {
    /// Print settings with secrets masked
    Show,
    /// Store Baidu credentials (secret goes to the OS keyring)
    SetBaidu {
        #[arg(value_name = "APP_ID")]
        app_id: String,
        #[arg(value_name = "SECRET")]
        secret: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> AppResult<ExitCode> {
    let path = settings_path(args.config.as_deref())?;

    match args.command {
        Command::Translate { from, to, text } => {
            let settings = AppSettings::load_with_secrets(&path).await?;
            let kind = args.provider.unwrap_or(settings.provider.translation_provider);
            let translator = TranslatorService::from_settings(&settings, kind)?;

            let source = from.unwrap_or_else(|| settings.preferences.default_source_lang.clone());
            let target = to.unwrap_or_else(|| settings.preferences.default_target_lang.clone());
            let result = translator.translate(&text.join(" "), &source, &target).await;

            println!("{}", result);
            Ok(if result.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Background(cmd) => {
            let store = BackgroundStore::open_default()?;
            match cmd {
                BackgroundCommand::Set { uri } => match store.select(&uri) {
                    Some(bitmap) => println!("background set: {}x{}", bitmap.width, bitmap.height),
                    None => {
                        eprintln!("could not decode image: {}", uri);
                        return Ok(ExitCode::FAILURE);
                    }
                },
                BackgroundCommand::Show => match store.current()? {
                    Some(image) => match store.load() {
                        Some(bitmap) => println!("{} ({}x{})", image, bitmap.width, bitmap.height),
                        None => println!("{} (unreadable, using solid fill)", image),
                    },
                    None => println!("no custom background"),
                },
                BackgroundCommand::Clear => {
                    store.clear()?;
                    println!("background cleared");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Languages => {
            for lang in LANGUAGES {
                println!("{:<4} {}", lang.code, lang.name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(ConfigCommand::Show) => {
            println!("{}", show_settings(&path).await?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Config(ConfigCommand::SetBaidu { app_id, secret }) => {
            set_baidu_credentials(&path, &app_id, &secret).await?;
            println!("saved to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Shell => {
            let settings = AppSettings::load_with_secrets(&path).await?;
            let kind = args.provider.unwrap_or(settings.provider.translation_provider);
            let screen = open_screen(&settings, kind)?;
            shell(&screen).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

const SHELL_HELP: &str = "\
type text to translate, or:
  :from CODE   set source language
  :to CODE     set target language
  :swap        swap languages
  :clear       clear input and result
  :bg URI      set background image
  :bg-reset    restore the solid background
  :langs       list languages
  :quit        exit";

async fn shell(screen: &ScreenController) -> AppResult<()> {
    println!("provider: {}", screen.provider_name());
    println!("{}", SHELL_HELP);
    println!("{}", screen.render()?);

    // Translations answer here; the prompt keeps reading meanwhile.
    let mut pending = JoinSet::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim_end();
        let (cmd, rest) = match line.split_once(' ') {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        let frame = match cmd {
            ":quit" | ":q" => break,
            ":help" => {
                println!("{}", SHELL_HELP);
                continue;
            }
            ":langs" => {
                for lang in LANGUAGES {
                    println!("{:<4} {}", lang.code, lang.name);
                }
                continue;
            }
            ":from" => screen.set_source_lang(rest),
            ":to" => screen.set_target_lang(rest),
            ":swap" => screen.swap_languages(),
            ":clear" => screen.clear_text(),
            ":bg" => match screen.pick_background(rest).await {
                Ok(Some(frame)) => Ok(frame),
                Ok(None) => {
                    eprintln!("could not decode image: {}", rest);
                    continue;
                }
                Err(e) => Err(e),
            },
            ":bg-reset" => screen.reset_background(),
            _ => screen.spawn_translation(line).map(|(frame, handle)| {
                if let Some(handle) = handle {
                    pending.spawn(async move {
                        match handle.await {
                            Ok(Ok(frame)) => println!("{}", frame),
                            Ok(Err(e)) => eprintln!("error: {}", e),
                            Err(e) => eprintln!("error: translation task failed: {}", e),
                        }
                    });
                }
                frame
            }),
        };

        match frame {
            Ok(frame) => println!("{}", frame),
            Err(e) => eprintln!("error: {}", e),
        }

        while pending.try_join_next().is_some() {}
    }

    // Piped input ends before the answers do.
    while pending.join_next().await.is_some() {}
    Ok(())
}
