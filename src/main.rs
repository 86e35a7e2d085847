use anyhow::{anyhow, Result};
use clap::{App as Cli, AppSettings, Arg, ArgMatches, SubCommand};
use std::str::FromStr;
use taskboard::app::{App, Command, TaskPatch};
use taskboard::config::Config;
use taskboard::repository::{Task, TaskPriority, TaskStatus, DEFAULT_PAGE};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let mut config = Config::new();
    config.load(global_value(&matches, "config"))?;
    if let Some(url) = global_value(&matches, "url") {
        config.api_base_url = Some(url.to_string());
    }
    if global_flag(&matches, "no-snapshot") {
        config.snapshot = false;
    }
    taskboard::logger::init(config.log_level_filter()?)?;

    if let ("configure", Some(sub)) = matches.subcommand() {
        return save_config(sub, &mut config);
    }

    let command = command(&matches, &config)?;
    let app = App::from_config(&config)?;
    for line in app.execute(command).await? {
        println!("{}", line);
    }
    Ok(())
}

fn cli() -> Cli<'static, 'static> {
    let status_arg = |required: bool| {
        Arg::with_name("status")
            .long("status")
            .takes_value(true)
            .required(required)
            .possible_values(&["Pending", "In Progress", "Completed"])
    };
    let priority_arg = |required: bool| {
        Arg::with_name("priority")
            .long("priority")
            .takes_value(true)
            .required(required)
            .possible_values(&["Low", "Medium", "High"])
    };
    let field_args = |required: bool| {
        vec![
            Arg::with_name("title")
                .long("title")
                .takes_value(true)
                .required(required),
            Arg::with_name("description")
                .long("description")
                .takes_value(true)
                .required(required),
            status_arg(required),
            priority_arg(required),
            Arg::with_name("due")
                .long("due")
                .takes_value(true)
                .required(required)
                .help("Due date, e.g. 2024-11-25"),
            Arg::with_name("subtask")
                .long("subtask")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .help("Subtask title; repeat for more"),
        ]
    };

    Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .takes_value(true)
                .global(true)
                .help("Configuration directory"),
        )
        .arg(
            Arg::with_name("url")
                .long("url")
                .takes_value(true)
                .global(true)
                .help("Remote task collection URL"),
        )
        .arg(
            Arg::with_name("no-snapshot")
                .long("no-snapshot")
                .global(true)
                .help("Do not read or write the local task snapshot"),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List tasks")
                .arg(Arg::with_name("page").long("page").takes_value(true))
                .arg(Arg::with_name("limit").long("limit").takes_value(true))
                .arg(
                    Arg::with_name("refresh")
                        .long("refresh")
                        .help("Fetch from the remote collection even when a snapshot exists"),
                )
                .arg(Arg::with_name("sorted").long("sorted").help("Order by due date"))
                .arg(status_arg(false))
                .arg(priority_arg(false)),
        )
        .subcommand(
            SubCommand::with_name("create")
                .about("Create a task")
                .args(&field_args(true)),
        )
        .subcommand(
            SubCommand::with_name("update")
                .about("Update a task")
                .arg(Arg::with_name("id").required(true))
                .args(&field_args(false))
                .arg(
                    Arg::with_name("toggle")
                        .long("toggle")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("Subtask id to mark done or undone"),
                ),
        )
        .subcommand(
            SubCommand::with_name("configure")
                .about("Save --url, --no-snapshot and the given settings to the configuration file")
                .arg(Arg::with_name("page-size").long("page-size").takes_value(true))
                .arg(
                    Arg::with_name("log-level")
                        .long("log-level")
                        .takes_value(true)
                        .possible_values(&["off", "error", "warn", "info", "debug", "trace"]),
                ),
        )
        .subcommand(
            SubCommand::with_name("delete")
                .about("Delete a task")
                .arg(Arg::with_name("id").required(true)),
        )
}

/// Global args may sit before or after the subcommand name.
///
fn global_value<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches
        .subcommand()
        .1
        .and_then(|sub| sub.value_of(name))
        .or_else(|| matches.value_of(name))
}

fn global_flag(matches: &ArgMatches, name: &str) -> bool {
    matches.is_present(name)
        || matches
            .subcommand()
            .1
            .map_or(false, |sub| sub.is_present(name))
}

fn parse<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>> {
    matches
        .value_of(name)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|_| anyhow!("Invalid value for --{}: {}", name, value))
        })
        .transpose()
}

fn values(matches: &ArgMatches, name: &str) -> Vec<String> {
    matches
        .values_of(name)
        .map(|values| values.map(str::to_string).collect())
        .unwrap_or_default()
}

fn required<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T> {
    parse(matches, name)?.ok_or_else(|| anyhow!("Missing value for {}", name))
}

fn save_config(matches: &ArgMatches, config: &mut Config) -> Result<()> {
    if let Some(page_size) = parse::<u32>(matches, "page-size")? {
        if page_size == 0 {
            return Err(anyhow!("Invalid value for --page-size: 0"));
        }
        config.page_size = page_size;
    }
    if let Some(level) = matches.value_of("log-level") {
        config.log_level = level.to_string();
        config.log_level_filter()?;
    }
    config.save()?;
    if let Some(path) = config.file_path() {
        println!("Saved configuration to {}", path.display());
    }
    Ok(())
}

fn command(matches: &ArgMatches, config: &Config) -> Result<Command> {
    match matches.subcommand() {
        ("list", Some(sub)) => Ok(Command::List {
            page: parse(sub, "page")?.unwrap_or(DEFAULT_PAGE),
            limit: parse(sub, "limit")?.unwrap_or(config.page_size),
            refresh: sub.is_present("refresh"),
            sorted: sub.is_present("sorted"),
            status: parse::<TaskStatus>(sub, "status")?,
            priority: parse::<TaskPriority>(sub, "priority")?,
        }),
        ("create", Some(sub)) => {
            let mut draft = Task::draft(
                &required::<String>(sub, "title")?,
                &required::<String>(sub, "description")?,
                required(sub, "status")?,
                required(sub, "priority")?,
                &required::<String>(sub, "due")?,
            );
            for title in values(sub, "subtask") {
                draft.add_subtask(&title);
            }
            Ok(Command::Create(draft))
        }
        ("update", Some(sub)) => Ok(Command::Update {
            id: required(sub, "id")?,
            patch: TaskPatch {
                title: parse(sub, "title")?,
                description: parse(sub, "description")?,
                status: parse(sub, "status")?,
                priority: parse(sub, "priority")?,
                due_date: parse(sub, "due")?,
                add_subtasks: values(sub, "subtask"),
                toggle_subtasks: values(sub, "toggle")
                    .iter()
                    .map(|id| id.parse::<i64>().map_err(|_| anyhow!("Invalid subtask id: {}", id)))
                    .collect::<Result<_>>()?,
            },
        }),
        ("delete", Some(sub)) => Ok(Command::Delete {
            id: required(sub, "id")?,
        }),
        _ => Err(anyhow!("Unknown command")),
    }
}
