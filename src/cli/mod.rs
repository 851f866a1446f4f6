use crate::{
    config::PlannerConfig, Activity, Formality, JsonFileStore, PackingPlanner, PackingSession,
    ResponseSchema, ShareOutcome, ShareTarget, StdoutShare, SystemClipboard,
};
use anyhow::{anyhow, bail, Context};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{path::PathBuf, time::Duration};
use tracing::info;

fn command() -> Command {
    Command::new("packing-planner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate, save and share trip packing lists with a generative model")
        .subcommand_required(true)
        .arg(
            Arg::new("store")
                .short('s')
                .long("store")
                .value_name("PATH")
                .global(true)
                .help("File holding the saved list (or set PACKING_STORE)"),
        )
        .arg(
            Arg::new("provider")
                .short('p')
                .long("provider")
                .value_name("NAME")
                .global(true)
                .value_parser(["gemini", "openai"])
                .help("Generation backend (or set PACKING_PROVIDER)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .global(true)
                .help("Model name (or set PACKING_MODEL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .global(true)
                .help("API key (or set GEMINI_API_KEY / OPENAI_API_KEY)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .global(true)
                .help("Provider base URL (or set PACKING_BASE_URL)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .global(true)
                .value_parser(clap::value_parser!(u64))
                .help("HTTP timeout in seconds; no timeout when omitted"),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a packing list for a trip")
                .arg(
                    Arg::new("destination")
                        .short('d')
                        .long("destination")
                        .required(true)
                        .help("Where you are travelling"),
                )
                .arg(
                    Arg::new("start")
                        .long("start")
                        .value_name("YYYY-MM-DD")
                        .required(true)
                        .help("First day of the trip"),
                )
                .arg(
                    Arg::new("end")
                        .long("end")
                        .value_name("YYYY-MM-DD")
                        .required(true)
                        .help("Last day of the trip"),
                )
                .arg(
                    Arg::new("activity")
                        .short('a')
                        .long("activity")
                        .value_name("DESCRIPTION[:day|night]")
                        .action(ArgAction::Append)
                        .help("Planned activity, repeatable"),
                )
                .arg(
                    Arg::new("formality")
                        .short('f')
                        .long("formality")
                        .value_parser(["casual", "business-casual", "formal"])
                        .default_value("casual"),
                )
                .arg(
                    Arg::new("light-luggage")
                        .short('l')
                        .long("light-luggage")
                        .action(ArgAction::SetTrue)
                        .help("Prefer fewer, multi-purpose items"),
                )
                .arg(
                    Arg::new("save")
                        .long("save")
                        .action(ArgAction::SetTrue)
                        .help("Save the generated list"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the list as JSON instead of text"),
                ),
        )
        .subcommand(Command::new("show").about("Print the saved packing list"))
        .subcommand(
            Command::new("share")
                .about("Share the saved packing list")
                .arg(
                    Arg::new("clipboard")
                        .long("clipboard")
                        .action(ArgAction::SetTrue)
                        .help("Copy to the system clipboard instead of printing"),
                ),
        )
        .subcommand(Command::new("clear").about("Delete the saved packing list"))
        .subcommand(Command::new("schema").about("Print the JSON schema sent to the model"))
}

/// CLI entry point for the packing-planner tool
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let matches = command().get_matches();
    let Some((name, sub)) = matches.subcommand() else {
        bail!("a subcommand is required");
    };
    // global flags are propagated into the subcommand's matches
    let config = resolve_config(sub)?;
    info!(
        provider = ?config.provider,
        model = config.model(),
        store = %config.store_path.display(),
        "Configuration loaded"
    );

    match name {
        "generate" => generate(&config, sub).await,
        "show" => show(&config),
        "share" => share(&config, sub.get_flag("clipboard")),
        "clear" => {
            let mut session = offline_session(&config);
            session.clear_saved_list();
            println!("Spremljeni popis je obrisan.");
            Ok(())
        }
        "schema" => {
            let schema = crate::PackingList::schema().schema_json();
            println!("{}", serde_json::to_string_pretty(schema)?);
            Ok(())
        }
        other => bail!("unknown subcommand `{other}`"),
    }
}

fn resolve_config(matches: &ArgMatches) -> anyhow::Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env().context("reading environment configuration")?;

    if let Some(provider) = matches.get_one::<String>("provider") {
        config.provider = provider.parse()?;
        // the key variable depends on the provider
        config.api_key = std::env::var(config.provider.api_key_var()).ok();
    }
    if let Some(api_key) = matches.get_one::<String>("api-key") {
        config.api_key = Some(api_key.clone());
    }
    if let Some(model) = matches.get_one::<String>("model") {
        config.model = Some(model.clone());
    }
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.base_url = Some(base_url.clone());
    }
    if let Some(store) = matches.get_one::<String>("store") {
        config.store_path = PathBuf::from(store);
    }
    if let Some(seconds) = matches.get_one::<u64>("timeout") {
        config.timeout = Some(Duration::from_secs(*seconds));
    }
    Ok(config)
}

async fn generate(config: &PlannerConfig, matches: &ArgMatches) -> anyhow::Result<()> {
    let planner = PackingPlanner::new(config.build_generator()?);
    info!(provider = planner.provider_name(), model = config.model(), "Provider ready");
    let mut session = PackingSession::new(
        planner,
        Box::new(JsonFileStore::new(config.store_path.clone())),
    );

    session.destination = matches
        .get_one::<String>("destination")
        .cloned()
        .unwrap_or_default();
    session.start_date = matches.get_one::<String>("start").cloned().unwrap_or_default();
    session.end_date = matches.get_one::<String>("end").cloned().unwrap_or_default();
    session.activities = matches
        .get_many::<String>("activity")
        .map(|values| values.map(|v| v.parse::<Activity>()).collect::<Result<Vec<_>, _>>())
        .transpose()?
        .unwrap_or_default();
    session.formality = matches
        .get_one::<String>("formality")
        .map(|value| value.parse::<Formality>())
        .transpose()?
        .unwrap_or_default();
    session.light_luggage = matches.get_flag("light-luggage");

    eprintln!(
        "Generiram popis za {} ({} dana)...",
        session.destination,
        session.duration()
    );
    session.generate_packing_list().await;

    if let Some(message) = session.error_message() {
        bail!("{message}");
    }
    let list = session
        .packing_list()
        .ok_or_else(|| anyhow!("no packing list was produced"))?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(list)?);
    } else {
        let trip = session.trip_details().snapshot();
        println!("{}", crate::render_share_text(list, &trip));
    }

    if matches.get_flag("save") {
        session.save_list();
        if let Some(message) = session.error_message() {
            bail!("{message}");
        }
        eprintln!("Popis je spremljen u {}.", config.store_path.display());
    }
    Ok(())
}

fn show(config: &PlannerConfig) -> anyhow::Result<()> {
    let mut session = offline_session(config);
    session.load_saved_list();

    match (session.packing_list(), session.list_trip()) {
        (Some(list), trip) => {
            let trip = trip.cloned().unwrap_or_default();
            println!("{}", crate::render_share_text(list, &trip));
        }
        (None, _) => println!("Nema spremljenog popisa."),
    }
    Ok(())
}

fn share(config: &PlannerConfig, clipboard: bool) -> anyhow::Result<()> {
    let mut session = offline_session(config);
    session.load_saved_list();

    let target: Box<dyn ShareTarget> = if clipboard {
        Box::new(SystemClipboard::new())
    } else {
        Box::new(StdoutShare)
    };

    match session.share_list(target.as_ref()) {
        Some(ShareOutcome::Copied) => eprintln!("Popis je kopiran u međuspremnik."),
        Some(ShareOutcome::Shared) => {}
        None => bail!(
            "{}",
            session.error_message().unwrap_or("Dijeljenje popisa nije uspjelo.")
        ),
    }
    Ok(())
}

/// Session for commands that never call the provider.
fn offline_session(config: &PlannerConfig) -> PackingSession {
    let planner = PackingPlanner::new(std::sync::Arc::new(OfflineGenerator));
    PackingSession::new(
        planner,
        Box::new(JsonFileStore::new(config.store_path.clone())),
    )
}

#[derive(Debug)]
struct OfflineGenerator;

#[async_trait::async_trait]
impl crate::TextGenerator for OfflineGenerator {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn generate(&self, _prompt: &str, _schema: &crate::SchemaHandle) -> crate::Result<String> {
        Err(crate::PlannerError::Config(
            "this command does not generate lists".to_string(),
        ))
    }
}
