use clap::{Arg, Command};
use rocket_mongokit::{ConnectionSettings, MongoConfig};

pub fn cli() -> Command {
    Command::new("mongokit-demo")
        .about("Demo server for rocket_mongokit")
        .subcommand(
            Command::new("check-config")
                .about("Resolve MONGO_URI and MONGO_DB_NAME without connecting")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the resolved settings as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("serve").about("Launch the HTTP server (default)"))
}

/// Returns `true` when the server should launch.
pub fn handle_cli() -> Result<bool, Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("check-config", sub_matches)) => {
            let config = MongoConfig::from_env()?;
            let settings = ConnectionSettings::parse(&config.uri, &config.db_name)?;

            if sub_matches.get_flag("json") {
                let report = serde_json::json!({
                    "uri": settings.uri,
                    "db_name": config.db_name,
                    "auto_start_request": settings.auto_start_request,
                    "tz_aware": settings.tz_aware,
                    "replica_set": settings.replica_set,
                    "use_greenlets": settings.use_greenlets,
                    "read_preference": settings.read_preference.map(|rp| format!("{rp:?}")),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("URI:                {}", settings.uri);
                println!("Database:           {}", config.db_name);
                println!("auto_start_request: {}", settings.auto_start_request);
                println!("tz_aware:           {}", settings.tz_aware);
                println!("Replica set:        {:?}", settings.replica_set);
                println!("use_greenlets:      {:?}", settings.use_greenlets);
                println!("Read preference:    {:?}", settings.read_preference);
            }

            Ok(false)
        }
        Some(("serve", _)) | None => Ok(true),
        _ => {
            cli().print_help()?;
            Ok(false)
        }
    }
}
