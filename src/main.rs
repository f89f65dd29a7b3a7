use std::env;
use std::process::ExitCode;

use pixgen::logger::{self, LogLevel, LoggerConfig};
use pixgen::{Action, App, AspectRatio, GeneratorConfig, PixgenError, Route};

const USAGE: &str = "\
usage:
  pixgen models
  pixgen generate [--model NAME] [--size WxH] [--ratio 1:1|16:9|4:3|3:2] [--download 0,3,...] PROMPT...
  pixgen favorites [clear]";

struct GenerateArgs {
    prompt: String,
    model: Option<String>,
    size: Option<(u32, u32)>,
    ratio: Option<AspectRatio>,
    download: Vec<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = env::var("PIXGEN_LOG")
        .ok()
        .and_then(|name| LogLevel::parse(&name))
        .unwrap_or(LogLevel::Info);
    if let Err(e) = logger::init_with_config(LoggerConfig::default().with_level(level)) {
        eprintln!("{}", e);
    }
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> Result<(), PixgenError> {
    let config = GeneratorConfig::from_env();
    logger::log_config_info(&config);

    let (command, rest) = match args.split_first() {
        Some((command, rest)) => (command.as_str(), rest),
        None => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let mut app = App::new(config)?;

    match command {
        "models" => {
            app.load_models().await;
            if let Some(warning) = &app.state().error {
                log::warn!("{}", warning);
            }
            for model in &app.state().models {
                println!("{}", model);
            }
        }
        "generate" => {
            let parsed = parse_generate_args(rest)?;
            generate(&mut app, parsed).await?;
        }
        "favorites" => match rest.first().map(String::as_str) {
            Some("clear") => {
                app.favorites().clear()?;
                println!("Favorites cleared.");
            }
            Some(other) => {
                return Err(PixgenError::InvalidParameters(format!(
                    "unknown favorites command: {}",
                    other
                )))
            }
            None => {
                app.dispatch(Action::Navigate(Route::Downloaded));
                print_favorites(&app);
            }
        },
        "help" | "--help" | "-h" => println!("{}", USAGE),
        other => {
            return Err(PixgenError::InvalidParameters(format!(
                "unknown command: {}\n{}",
                other, USAGE
            )))
        }
    }

    Ok(())
}

async fn generate(app: &mut App, args: GenerateArgs) -> Result<(), PixgenError> {
    app.load_models().await;
    if let Some(warning) = app.state().error.clone() {
        log::warn!("{}", warning);
    }

    app.dispatch(Action::SetPrompt(args.prompt));
    if let Some(model) = args.model {
        if !app.state().models.contains(&model) {
            log::warn!("Model '{}' is not in the advertised list, using it anyway", model);
        }
        app.dispatch(Action::SelectModel(model));
    }
    if let Some(ratio) = args.ratio {
        app.dispatch(Action::ApplyPreset(ratio));
    }
    if let Some((width, height)) = args.size {
        app.dispatch(Action::SetWidth(width));
        app.dispatch(Action::SetHeight(height));
    }

    let batch = match app.submit().await? {
        Some(batch) => batch,
        None => {
            log::warn!("Prompt is empty, nothing to generate");
            return Ok(());
        }
    };

    println!("Result (base seed {}):", batch.base_seed);
    for (index, image) in batch.images.iter().enumerate() {
        match &image.url {
            Some(url) => println!("  [{}] seed {}  {}", index, image.seed, url),
            None => println!(
                "  [{}] seed {}  Unable to load image ({})",
                index,
                image.seed,
                image.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    for index in args.download {
        match app.download_index(index).await {
            Ok(path) => println!("Saved [{}] to {}", index, path.display()),
            Err(e) => {
                log::error!("{}", e);
                if let Some(alert) = app.state().alert.clone() {
                    eprintln!("{}", alert);
                    app.dispatch(Action::DismissAlert);
                }
            }
        }
    }

    Ok(())
}

fn print_favorites(app: &App) {
    let favorites = app.favorites().list();
    if favorites.is_empty() {
        println!("You haven't downloaded any images yet.");
        println!("Run `pixgen generate --download 0 <prompt>` to generate and save one.");
        return;
    }

    println!("Your Downloaded Images ({}):", favorites.len());
    for favorite in favorites {
        println!(
            "  {}  {}  {}x{}  {}",
            favorite.prompt, favorite.model, favorite.width, favorite.height, favorite.url
        );
    }
}

fn parse_generate_args(args: &[String]) -> Result<GenerateArgs, PixgenError> {
    let mut parsed = GenerateArgs {
        prompt: String::new(),
        model: None,
        size: None,
        ratio: None,
        download: Vec::new(),
    };
    let mut words = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| PixgenError::InvalidParameters(format!("{} needs a value", flag)))
        };
        match arg.as_str() {
            "--model" => parsed.model = Some(value("--model")?),
            "--ratio" => parsed.ratio = Some(value("--ratio")?.parse()?),
            "--size" => parsed.size = Some(parse_size(&value("--size")?)?),
            "--download" => {
                parsed.download = value("--download")?
                    .split(',')
                    .map(|index| {
                        index.trim().parse::<usize>().map_err(|_| {
                            PixgenError::InvalidParameters(format!("bad image index: {}", index))
                        })
                    })
                    .collect::<Result<_, _>>()?;
            }
            _ => words.push(arg.clone()),
        }
    }

    parsed.prompt = words.join(" ");
    Ok(parsed)
}

fn parse_size(raw: &str) -> Result<(u32, u32), PixgenError> {
    let invalid = || PixgenError::InvalidParameters(format!("size must look like 1024x768: {}", raw));
    let (width, height) = raw.split_once(['x', 'X']).ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}
