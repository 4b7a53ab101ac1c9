use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use crate::{bootstrap::BootStrap, clap_app};
use clap::ArgMatches;
use toolshed::{
    collaborators::{
        ColorPicker, CommandSynthesizer, ConsoleNotifier, FsFileAccess, NoticeKind,
        PromptColorPicker, SpeechOptions, SpeechSynthesizer, SystemClipboard,
    },
    color::{Color, ColorStop, Gradient, GradientKind},
    config::MainConfig,
    constants::{gradient as gradient_limits, limits::*},
    context::{AppContext, Theme, TomlPreferenceStore},
    controller::{Delivery, ToolsController},
    debug,
    error::*,
    generators::{
        lorem::{self, LoremOptions, LoremUnit},
        password::{generate_password, CharsetFlags},
        random::{self, BatchSummary, RandomSettings},
        uuid::{generate_batch, UuidFormat, UuidVersion},
    },
    json,
    stopwatch::{format_time, now_ms, Countdown, Stopwatch, StopwatchAction},
    string_utils::TextStats,
    todo::{Action, Filter, Priority, TodoList},
    transforms::{
        number::DECIMAL_PLACES_OPTION, NumberStyle, Options, TransformManager, TransformRegistry,
        TransformRequest,
    },
    utils::{self, download_filename},
};

/// Text operations shown by `format --list`, the rest belong to `case`
const FORMAT_OPERATIONS: [&str; 5] = [
    "remove-spaces",
    "remove-line-breaks",
    "remove-duplicates",
    "trim-lines",
    "slugify",
];

pub struct App {
    pub matches: ArgMatches,
}

impl App {
    pub fn new() -> Result<Self> {
        #[cfg(windows)]
        let _ = nu_ansi_term::enable_ansi_support();

        let interactive_output = std::io::stdout().is_terminal();

        Ok(App {
            matches: Self::matches(interactive_output)?,
        })
    }

    pub fn matches(interactive_output: bool) -> Result<ArgMatches> {
        Ok(clap_app::build_app(interactive_output).get_matches())
    }

    /// Start the application, bootstraps the configuration and the collaborators
    /// and forwards the request to the matching tool.
    ///
    /// # Returns
    /// A `Result` indicating whether the tool completed successfully.
    pub fn start(&self) -> Result<bool> {
        let bootstrap = BootStrap::new()?;
        let config = bootstrap.get_config();
        let mut context = AppContext::load(Box::new(TomlPreferenceStore::new(
            bootstrap.preferences_file()?,
        )))?;

        let (command, args) = self
            .matches
            .subcommand()
            .ok_or_else(|| Error::ArgsProcessingError("no tool selected".to_string()))?;
        debug!("Running tool \"{}\"", command);

        let colored = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        let notifier = ConsoleNotifier::new(context.theme())
            .quiet(args.get_flag("quiet"))
            .colored(colored);
        let files = FsFileAccess::new(bootstrap.output_dir()?);
        let clipboard = SystemClipboard::detect();
        let controller = ToolsController::new(&files, &clipboard, &notifier)
            .with_date_stamp(config.files.date_stamp.then(utils::today));
        let tools = Tools {
            bootstrap: &bootstrap,
            config,
            controller,
        };

        match command {
            "case" => tools.text_operation(args, false)?,
            "format" => tools.text_operation(args, true)?,
            "number" => tools.number(args)?,
            "stats" => tools.stats(args)?,
            "lorem" => tools.lorem(args)?,
            "password" => tools.password(args)?,
            "uuid" => tools.uuid(args)?,
            "random" => tools.random(args)?,
            "color" => tools.color(args)?,
            "gradient" => tools.gradient(args)?,
            "json" => return tools.json(args),
            "todo" => tools.todo(args)?,
            "timer" => tools.timer(args)?,
            "stopwatch" => tools.stopwatch()?,
            "speak" => tools.speak(args)?,
            "theme" => tools.theme(args, &mut context)?,
            #[cfg(feature = "fetcher")]
            "joke" => tools.joke(args)?,
            #[cfg(feature = "fetcher")]
            "grammar" | "comment" => tools.assistant(command, args)?,
            #[cfg(feature = "imaging")]
            "image" => tools.image(args)?,
            #[cfg(feature = "imaging")]
            "qr" => tools.qr(args)?,
            #[cfg(feature = "imaging")]
            "avatar" => tools.avatar(args)?,
            _ => {
                return Err(Error::ArgsProcessingError(format!(
                    "unknown tool \"{}\"",
                    command
                )))
            }
        }
        Ok(true)
    }
}

/// Delivery requested through the global `--copy` and `--output` arguments
fn delivery(args: &ArgMatches) -> Delivery {
    Delivery::new(args.get_flag("copy"), args.get_one::<String>("output").cloned())
}

/// Applies an operation as a full request, rejecting blank input
fn run_operation(
    registry: &TransformRegistry,
    operation: &str,
    text: String,
    options: Options,
) -> Result<String> {
    let request = TransformRequest::new(text, operation).with_options(options);
    Ok(registry.apply_request(&request)?.output_text)
}

fn string_arg<'a>(args: &'a ArgMatches, id: &str) -> Option<&'a str> {
    args.get_one::<String>(id).map(String::as_str)
}

fn joined_arg(args: &ArgMatches, id: &str) -> String {
    args.get_many::<String>(id)
        .map(|values| values.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

struct Tools<'a> {
    bootstrap: &'a BootStrap,
    config: &'a MainConfig,
    controller: ToolsController<'a>,
}

impl<'a> Tools<'a> {
    /// Reads the text argument, the `--input` file or the piped standard input
    fn input(&self, args: &ArgMatches) -> Result<String> {
        self.input_from(args, "text")
    }

    fn input_from(&self, args: &ArgMatches, id: &str) -> Result<String> {
        let text = string_arg(args, id);
        let file = args.get_one::<PathBuf>("input").map(PathBuf::as_path);
        let stdin = io::stdin();
        if text.is_none() && file.is_none() && stdin.is_terminal() {
            return Err(Error::ArgsProcessingError(
                "no text given (use an argument, --input or the standard input)".to_string(),
            ));
        }
        self.controller
            .read_input(text, file, &mut stdin.lock(), MAX_TEXT_BYTES)
    }

    fn deliver(&self, args: &ArgMatches, text: &str, suggested_name: &str) -> Result<()> {
        self.controller
            .deliver(&mut io::stdout().lock(), text, suggested_name, &delivery(args))
    }

    fn info(&self, message: &str) {
        self.controller.notifier().notify(message, NoticeKind::Info);
    }

    fn success(&self, message: &str) {
        self.controller.notifier().notify(message, NoticeKind::Success);
    }

    fn text_operation(&self, args: &ArgMatches, formatting: bool) -> Result<()> {
        let registry = TransformManager::get().text();
        if args.get_flag("list") {
            let mut stdout = io::stdout().lock();
            for descriptor in registry
                .descriptors()
                .filter(|d| FORMAT_OPERATIONS.contains(&d.id.as_str()) == formatting)
            {
                writeln!(stdout, "{:<20}{}", descriptor.id, descriptor.label)?;
            }
            return Ok(());
        }

        let operation = string_arg(args, "operation").unwrap_or_default();
        if !registry.contains(operation) {
            return Err(Error::UnknownOperation(operation.to_string()));
        }
        let text = self.input(args)?;
        let converted = run_operation(&registry, operation, text, Options::new())?;
        let tool = if formatting { "formatted" } else { "converted" };
        self.deliver(args, &converted, &download_filename(tool, operation, "txt"))
    }

    fn number(&self, args: &ArgMatches) -> Result<()> {
        let style = match string_arg(args, "style") {
            Some(style) => style.parse::<NumberStyle>()?,
            None => self.config.defaults.number_style,
        };
        let decimals = args
            .get_one::<u8>("decimals")
            .copied()
            .unwrap_or(self.config.defaults.decimal_places);
        let text = self.input(args)?;
        let options = Options::new().with(DECIMAL_PLACES_OPTION, decimals);
        let formatted = run_operation(
            &TransformManager::get().numeric(),
            &style.to_string(),
            text,
            options,
        )?;
        self.deliver(
            args,
            &formatted,
            &download_filename("formatted-numbers", &style.to_string(), "txt"),
        )
    }

    fn stats(&self, args: &ArgMatches) -> Result<()> {
        let text = self.input(args)?;
        let stats = TextStats::of(&text);
        let report = format!(
            "Characters: {}\nGraphemes:  {}\nWords:      {}\nLines:      {}",
            stats.characters, stats.graphemes, stats.words, stats.lines
        );
        self.deliver(args, &report, "text-stats.txt")
    }

    fn lorem(&self, args: &ArgMatches) -> Result<()> {
        let unit = match string_arg(args, "unit") {
            Some(unit) => unit.parse::<LoremUnit>()?,
            None => self.config.defaults.lorem_unit,
        };
        let count = args
            .get_one::<usize>("count")
            .copied()
            .unwrap_or(self.config.defaults.lorem_count);
        let options = LoremOptions {
            start_with_lorem: !args.get_flag("no-lorem"),
            html_tags: args.get_flag("html"),
        };
        let count = unit.clamp(count);
        let text = lorem::generate(unit, count, options);
        self.deliver(args, &text, &lorem::download_name(unit, count))
    }

    fn password(&self, args: &ArgMatches) -> Result<()> {
        let length = args
            .get_one::<usize>("length")
            .copied()
            .unwrap_or(self.config.defaults.password_length);
        let flags = CharsetFlags {
            lowercase: !args.get_flag("no-lower"),
            uppercase: !args.get_flag("no-upper"),
            digits: !args.get_flag("no-digits"),
            symbols: !args.get_flag("no-symbols"),
        };
        let password = generate_password(length, flags, string_arg(args, "exclude").unwrap_or(""))?;
        if password.is_degraded() {
            self.controller.notifier().notify(
                "Secure random source unavailable, a fallback generator was used",
                NoticeKind::Error,
            );
        }
        self.info(&format!(
            "Strength: {} ({}/10)",
            password.label(),
            password.strength
        ));
        self.deliver(args, &password.value, "password.txt")
    }

    fn uuid(&self, args: &ArgMatches) -> Result<()> {
        let version = match string_arg(args, "uuid_version") {
            Some(version) => version.parse::<UuidVersion>()?,
            None => UuidVersion::V4,
        };
        let count = args
            .get_one::<usize>("count")
            .copied()
            .unwrap_or(self.config.defaults.uuid_count);
        let format = UuidFormat {
            hyphens: !args.get_flag("no-hyphens"),
            uppercase: args.get_flag("uppercase"),
        };
        let uuids = generate_batch(
            version,
            count,
            string_arg(args, "namespace"),
            string_arg(args, "name"),
            format,
        )?;
        self.deliver(
            args,
            &uuids.join("\n"),
            &download_filename("uuids", &version.to_string(), "txt"),
        )
    }

    fn random(&self, args: &ArgMatches) -> Result<()> {
        let mut settings = match args.get_one::<PathBuf>("settings") {
            Some(path) => {
                let data = self
                    .controller
                    .files()
                    .read_text_file(path, MAX_SETTINGS_BYTES)?;
                let settings = data.parse::<RandomSettings>()?;
                self.info(&format!("Settings loaded from {}", path.display()));
                settings
            }
            None => RandomSettings::default(),
        };
        if let Some(min) = args.get_one::<i64>("min") {
            settings.min = *min;
        }
        if let Some(max) = args.get_one::<i64>("max") {
            settings.max = *max;
        }
        if let Some(quantity) = args.get_one::<usize>("quantity") {
            settings.quantity = *quantity;
        }

        let numbers = random::generate(settings)?;
        if numbers.len() > 1 {
            if let Some(summary) = BatchSummary::of(&numbers) {
                self.info(&format!(
                    "Min: {}  Max: {}  Average: {:.2}",
                    summary.min, summary.max, summary.average
                ));
            }
        }
        let text = numbers
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.deliver(args, &text, "random-numbers.txt")
    }

    fn color(&self, args: &ArgMatches) -> Result<()> {
        let color = if args.get_flag("random") {
            Color::random()
        } else if args.get_flag("pick") {
            let stdin = io::stdin();
            PromptColorPicker::new(stdin.lock(), io::stderr())
                .pick()?
                .parse::<Color>()?
        } else {
            string_arg(args, "color")
                .ok_or_else(|| {
                    Error::ArgsProcessingError(
                        "a color, --random or --pick is required".to_string(),
                    )
                })?
                .parse::<Color>()?
        };

        let converted = color.convert();
        let text = if args.get_flag("json") {
            serde_json::to_string_pretty(&converted)?
        } else {
            let mut lines = vec![
                format!("HEX   {}", converted.hex),
                format!("HEX8  {}", converted.hex8),
                format!("RGB   {}", converted.rgb),
                format!("HSL   {}", converted.hsl),
                format!("HSV   {}", converted.hsv),
            ];
            if let Some(name) = &converted.name {
                lines.push(format!("NAME  {}", name));
            }
            lines.join("\n")
        };
        self.deliver(args, &text, &converted.download_name())
    }

    fn gradient(&self, args: &ArgMatches) -> Result<()> {
        let gradient = match args.get_one::<PathBuf>("load") {
            Some(path) => {
                let data = self
                    .controller
                    .files()
                    .read_text_file(path, gradient_limits::MAX_CONFIG_BYTES)?;
                let gradient = Gradient::from_json(&data)?;
                self.success("Gradient configuration loaded!");
                gradient
            }
            None => self.gradient_from_args(args)?,
        };

        let (text, suggested) = if args.get_flag("json") {
            (gradient.to_json()?, "gradient-config.json")
        } else {
            (gradient.css_code(), "gradient.css")
        };
        self.deliver(args, &text, suggested)
    }

    fn gradient_from_args(&self, args: &ArgMatches) -> Result<Gradient> {
        let defaults = Gradient::default();
        let kind = match string_arg(args, "type") {
            Some(kind) => kind.parse::<GradientKind>()?,
            None => defaults.gradient_type,
        };
        let angle = args.get_one::<u16>("angle").copied().unwrap_or(defaults.angle);
        let stops: Vec<&str> = args
            .get_many::<String>("stops")
            .map(|values| values.map(String::as_str).collect())
            .unwrap_or_default();
        if stops.is_empty() {
            return Ok(Gradient {
                gradient_type: kind,
                angle,
                ..defaults
            });
        }

        let parsed = stops
            .iter()
            .map(|stop| stop.parse::<ColorStop>())
            .collect::<Result<Vec<_>>>()?;
        if stops.iter().any(|stop| stop.contains(':')) {
            let gradient = Gradient {
                gradient_type: kind,
                angle,
                color_stops: parsed,
            };
            gradient.validate()?;
            Ok(gradient)
        } else {
            let colors: Vec<&str> = parsed.iter().map(|stop| stop.color.as_str()).collect();
            Gradient::evenly_spaced(kind, angle, &colors)
        }
    }

    /// Returns `false` when the validated document is invalid
    fn json(&self, args: &ArgMatches) -> Result<bool> {
        let (command, args) = args
            .subcommand()
            .ok_or_else(|| Error::ArgsProcessingError("no json command".to_string()))?;
        let input = self.input(args)?;
        match command {
            "format" => {
                let indent = args
                    .get_one::<usize>("indent")
                    .copied()
                    .unwrap_or(self.config.defaults.json_indent);
                let formatted = json::format(&input, indent)?;
                self.deliver(args, &formatted, "formatted.json")?;
            }
            "minify" => {
                let minified = json::minify(&input)?;
                self.deliver(args, &minified, "minified.json")?;
            }
            "validate" => {
                if let Err(e) = json::validate(&input) {
                    self.controller
                        .notifier()
                        .notify(&format!("Invalid JSON: {}", e), NoticeKind::Error);
                    return Ok(false);
                }
                self.success("Valid JSON!");
            }
            "csv" => {
                let delimiter = json::parse_delimiter(
                    string_arg(args, "delimiter").unwrap_or(&self.config.defaults.csv_delimiter),
                )?;
                let csv = json::json_to_csv(&input, delimiter)?;
                self.deliver(args, csv.trim_end(), "converted.csv")?;
            }
            _ => {
                return Err(Error::ArgsProcessingError(format!(
                    "unknown json command \"{}\"",
                    command
                )))
            }
        }
        Ok(true)
    }

    fn load_todos(&self, path: &Path) -> Result<TodoList> {
        match std::fs::read_to_string(path) {
            Ok(data) => serde_json::from_str(&data).map_err(|e| Error::FileReadError {
                file: path.display().to_string(),
                cause: e.to_string(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(TodoList::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save_todos(&self, path: &Path, list: &TodoList) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(list)?)?;
        debug!("Saved {} todos to {}", list.todos.len(), path.display());
        Ok(())
    }

    fn todo(&self, args: &ArgMatches) -> Result<()> {
        let path = self.bootstrap.todos_file()?;
        let list = self.load_todos(&path)?;
        let (command, args) = args
            .subcommand()
            .ok_or_else(|| Error::ArgsProcessingError("no todo command".to_string()))?;

        let id = || args.get_one::<u64>("id").copied().unwrap_or_default();
        let action = match command {
            "list" => return self.list_todos(&list, args),
            "export" => {
                let export = list.export_json()?;
                let name = utils::dated_filename("todo-list", "json", utils::today());
                return self.deliver(args, &export, &name);
            }
            "add" => Action::Add {
                text: joined_arg(args, "text"),
                category: string_arg(args, "category").map(String::from),
                priority: string_arg(args, "priority")
                    .map(str::parse::<Priority>)
                    .transpose()?
                    .unwrap_or_default(),
                created_at: chrono::Utc::now(),
            },
            "done" => Action::Toggle(id()),
            "rm" => Action::Delete(id()),
            "edit" => Action::Edit {
                id: id(),
                text: joined_arg(args, "text"),
            },
            "priority" => Action::SetPriority {
                id: id(),
                priority: string_arg(args, "priority").unwrap_or_default().parse()?,
            },
            "category" => Action::AddCategory(string_arg(args, "name").unwrap_or_default().to_string()),
            "clear" => Action::ClearCompleted,
            "import" => {
                let file = args
                    .get_one::<PathBuf>("file")
                    .ok_or_else(|| Error::ArgsProcessingError("missing import file".to_string()))?;
                let data = self.controller.files().read_text_file(file, MAX_TEXT_BYTES)?;
                Action::Import(TodoList::parse_import(&data)?)
            }
            _ => {
                return Err(Error::ArgsProcessingError(format!(
                    "unknown todo command \"{}\"",
                    command
                )))
            }
        };

        let list = list.reduce(action)?;
        self.save_todos(&path, &list)?;
        self.success(&format!(
            "{} active, {} completed",
            list.active_count(),
            list.completed_count()
        ));
        Ok(())
    }

    fn list_todos(&self, list: &TodoList, args: &ArgMatches) -> Result<()> {
        let filter = string_arg(args, "filter")
            .map(str::parse::<Filter>)
            .transpose()?
            .unwrap_or_default();
        let category = string_arg(args, "category");
        let mut stdout = io::stdout().lock();
        for todo in list
            .filtered(filter)
            .filter(|todo| category.map_or(true, |c| todo.category == c))
        {
            writeln!(
                stdout,
                "{:>4} [{}] {} ({}, {})",
                todo.id,
                if todo.completed { "x" } else { " " },
                todo.text,
                todo.category,
                todo.priority
            )?;
        }
        Ok(())
    }

    fn timer(&self, args: &ArgMatches) -> Result<()> {
        let value = |id: &str| args.get_one::<u64>(id).copied().unwrap_or(0);
        let countdown = Countdown::start(value("hours"), value("minutes"), value("seconds"), now_ms())?;
        let mut stdout = io::stdout().lock();
        loop {
            let now = now_ms();
            write!(stdout, "\r{}", format_time(countdown.remaining(now)))?;
            stdout.flush()?;
            if countdown.finished(now) {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
        writeln!(stdout, "\x07")?;
        self.success("Time's up!");
        Ok(())
    }

    fn stopwatch(&self) -> Result<()> {
        self.info("Enter: lap, p: pause/resume, r: reset, q: stop");
        let mut stopwatch = Stopwatch::new().reduce(StopwatchAction::Start, now_ms());
        let mut stdout = io::stdout().lock();
        for line in io::stdin().lock().lines() {
            let now = now_ms();
            let action = match line?.trim() {
                "" => StopwatchAction::Lap,
                "p" if stopwatch.is_running() => StopwatchAction::Pause,
                "p" => StopwatchAction::Start,
                "r" => StopwatchAction::Reset,
                "q" => break,
                other => {
                    self.info(&format!("Unknown command \"{}\"", other));
                    continue;
                }
            };
            stopwatch = stopwatch.reduce(action, now);
            match action {
                StopwatchAction::Lap if stopwatch.is_running() => writeln!(
                    stdout,
                    "Lap {:>3}  {}",
                    stopwatch.laps().len(),
                    format_time(stopwatch.elapsed(now))
                )?,
                _ => writeln!(stdout, "{}", format_time(stopwatch.elapsed(now)))?,
            }
        }
        writeln!(stdout, "Total  {}", format_time(stopwatch.elapsed(now_ms())))?;
        Ok(())
    }

    fn speak(&self, args: &ArgMatches) -> Result<()> {
        let synthesizer = CommandSynthesizer::detect();
        if !synthesizer.is_available() {
            return Err(Error::CommandError(
                "no speech synthesizer found (espeak-ng, espeak or say)".to_string(),
            ));
        }
        if args.get_flag("voices") {
            let mut stdout = io::stdout().lock();
            for voice in synthesizer.voices()? {
                writeln!(stdout, "{}", voice)?;
            }
            return Ok(());
        }

        let defaults = SpeechOptions::default();
        let options = SpeechOptions {
            rate: args.get_one::<f32>("rate").copied().unwrap_or(defaults.rate),
            pitch: args.get_one::<f32>("pitch").copied().unwrap_or(defaults.pitch),
            volume: args.get_one::<f32>("volume").copied().unwrap_or(defaults.volume),
            voice: args.get_one::<String>("voice").cloned(),
        };
        let text = self.input(args)?;
        synthesizer.speak(&text, &options)
    }

    fn theme(&self, args: &ArgMatches, context: &mut AppContext) -> Result<()> {
        match string_arg(args, "theme") {
            None => {}
            Some("toggle") => {
                context.toggle_theme()?;
            }
            Some(theme) => context.set_theme(theme.parse::<Theme>()?)?,
        }
        writeln!(io::stdout().lock(), "{}", context.theme())?;
        Ok(())
    }

    #[cfg(feature = "fetcher")]
    fn http_client(&self) -> toolshed::fetcher::HttpClient {
        use toolshed::fetcher::{FetchOptions, HttpClient};
        HttpClient::new(FetchOptions::from(&self.config.network))
    }

    #[cfg(feature = "fetcher")]
    fn joke(&self, args: &ArgMatches) -> Result<()> {
        use toolshed::jokes::{favorites_filename, joke_filename, Favorites, JokeClient};

        let path = self.bootstrap.favorites_file()?;
        let mut favorites = match std::fs::read_to_string(&path) {
            Ok(data) => Favorites::import_json(&data)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Favorites::new(),
            Err(e) => return Err(e.into()),
        };
        let save_favorites = |favorites: &Favorites| -> Result<()> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let data = if favorites.is_empty() {
                "[]".to_string()
            } else {
                favorites.export_json()?
            };
            std::fs::write(&path, data)?;
            Ok(())
        };

        if let Some(file) = args.get_one::<PathBuf>("import") {
            let data = self.controller.files().read_text_file(file, MAX_TEXT_BYTES)?;
            favorites = Favorites::import_json(&data)?;
            save_favorites(&favorites)?;
            self.success(&format!("Imported {} favorite jokes", favorites.len()));
            return Ok(());
        }
        if args.get_flag("favorites") {
            let export = favorites.export_json()?;
            return self.deliver(args, &export, &favorites_filename(utils::today()));
        }

        let client = JokeClient::with_url(self.http_client(), self.config.network.joke_url.as_str());
        let joke = client.fetch()?;
        if args.get_flag("save") {
            let added = favorites.toggle(&joke, chrono::Utc::now());
            save_favorites(&favorites)?;
            self.success(if added {
                "Added to favorites!"
            } else {
                "Removed from favorites"
            });
        }
        self.deliver(args, &joke, &joke_filename(utils::today()))
    }

    #[cfg(feature = "fetcher")]
    fn assistant(&self, command: &str, args: &ArgMatches) -> Result<()> {
        use toolshed::assistant::{GenerativeClient, Task};

        let task = if command == "grammar" {
            Task::FixGrammar
        } else {
            Task::ImproveComment
        };
        let text = self.input(args)?;
        let client = GenerativeClient::from_env(self.http_client(), &self.config.network)?;
        let result = client.run(task, &text)?;
        self.deliver(args, &result, &download_filename("assistant", command, "txt"))
    }

    #[cfg(feature = "imaging")]
    fn image(&self, args: &ArgMatches) -> Result<()> {
        use toolshed::canvas::{
            cropped_filename, resized_filename, shaped_filename, ExportFormat,
            RasterCanvas, Shape, DEFAULT_CORNER_RADIUS, DEFAULT_JPEG_QUALITY,
        };

        let (command, args) = args
            .subcommand()
            .ok_or_else(|| Error::ArgsProcessingError("no image command".to_string()))?;
        let path = args
            .get_one::<PathBuf>("image")
            .ok_or_else(|| Error::ArgsProcessingError("missing image".to_string()))?;
        let canvas = RasterCanvas::load(self.controller.files(), path)?;
        let (width, height) = canvas.dimensions();
        self.info(&format!("Loaded {} ({}x{})", path.display(), width, height));

        let export_format = |default: &str| {
            ExportFormat::parse(
                string_arg(args, "format").unwrap_or(default),
                args.get_one::<u8>("quality").copied().unwrap_or(DEFAULT_JPEG_QUALITY),
            )
        };
        let (bytes, suggested) = match command {
            "crop" => {
                let format = export_format("jpeg")?;
                let (cropped, label) = match string_arg(args, "region") {
                    Some(region) => (canvas.crop(parse_region(region)?)?, "custom".to_string()),
                    None => {
                        let label = string_arg(args, "aspect").unwrap_or("16:9");
                        (canvas.crop_to_aspect(parse_aspect(label)?)?, label.to_string())
                    }
                };
                let name = cropped_filename(&label);
                let name = match format {
                    ExportFormat::Png => name.replace(".jpg", ".png"),
                    ExportFormat::Jpeg(_) => name,
                };
                (cropped.export(format)?, name)
            }
            "resize" => {
                let format = export_format("png")?;
                let target_width = args.get_one::<u32>("width").copied().unwrap_or(width);
                let target_height = args.get_one::<u32>("height").copied().unwrap_or(height);
                let resized = canvas.resize(target_width, target_height, !args.get_flag("stretch"))?;
                let (w, h) = resized.dimensions();
                (resized.export(format)?, resized_filename(w, h, format))
            }
            "shape" => {
                let shape = match string_arg(args, "shape").unwrap_or("circle").parse::<Shape>()? {
                    Shape::Rounded(_) => Shape::Rounded(
                        args.get_one::<u32>("radius").copied().unwrap_or(DEFAULT_CORNER_RADIUS),
                    ),
                    shape => shape,
                };
                (canvas.shape(shape).export(ExportFormat::Png)?, shaped_filename(shape))
            }
            _ => {
                return Err(Error::ArgsProcessingError(format!(
                    "unknown image command \"{}\"",
                    command
                )))
            }
        };

        self.deliver_image(args, &bytes, &suggested)
    }

    #[cfg(feature = "imaging")]
    fn qr(&self, args: &ArgMatches) -> Result<()> {
        use toolshed::qr::{generate, Correction, QrOptions, QR_FILENAME};

        let text = self.input(args)?;
        let defaults = QrOptions::default();
        let options = QrOptions {
            size: args.get_one::<u32>("size").copied().unwrap_or(defaults.size),
            margin: args.get_one::<u32>("margin").copied().unwrap_or(defaults.margin),
            dark: color_arg(args, "dark")?.unwrap_or(defaults.dark),
            light: color_arg(args, "light")?.unwrap_or(defaults.light),
            correction: match string_arg(args, "level") {
                Some(level) => level.parse::<Correction>()?,
                None => defaults.correction,
            },
        };
        let bytes = generate(text.trim(), &options)?;
        self.deliver_image(args, &bytes, QR_FILENAME)
    }

    #[cfg(feature = "imaging")]
    fn avatar(&self, args: &ArgMatches) -> Result<()> {
        use toolshed::avatar::{generate, initials, AvatarOptions, LetterFont, AVATAR_FILENAME};
        use toolshed::canvas::Shape;

        let name = self.input_from(args, "name")?;
        let letters = initials(&name)?;
        let defaults = AvatarOptions::default();
        let background = if args.get_flag("random-color") {
            Color::random()
        } else {
            color_arg(args, "background")?.unwrap_or(defaults.background)
        };
        let options = AvatarOptions {
            size: args.get_one::<u32>("size").copied().unwrap_or(defaults.size),
            font_size: args.get_one::<u32>("font-size").copied().unwrap_or(defaults.font_size),
            background,
            style: string_arg(args, "style").unwrap_or("square").parse::<Shape>()?,
        };
        self.info(&format!("Initials {} on {}", letters, background.to_hex_string()));
        let bytes = generate(&letters, &options, &LetterFont::system()?)?;
        self.deliver_image(args, &bytes, AVATAR_FILENAME)
    }

    /// Saves generated images, the clipboard only taking text
    #[cfg(feature = "imaging")]
    fn deliver_image(&self, args: &ArgMatches, bytes: &[u8], suggested: &str) -> Result<()> {
        let delivery = delivery(args);
        if delivery.copy {
            self.info("Images cannot be copied to the clipboard, saving instead");
        }
        self.controller.deliver_bytes(bytes, suggested, &delivery)?;
        Ok(())
    }
}

#[cfg(feature = "imaging")]
fn color_arg(args: &ArgMatches, id: &str) -> Result<Option<Color>> {
    string_arg(args, id).map(str::parse::<Color>).transpose()
}

/// Parses `W:H` (or `original` for the image's own ratio)
#[cfg(feature = "imaging")]
fn parse_aspect(label: &str) -> Result<Option<f64>> {
    if label.eq_ignore_ascii_case("original") {
        return Ok(None);
    }
    let malformed = || invalid(format!("invalid aspect ratio \"{}\" (expected W:H)", label));
    let (w, h) = label.split_once(':').ok_or_else(malformed)?;
    let w: f64 = w.trim().parse().map_err(|_| malformed())?;
    let h: f64 = h.trim().parse().map_err(|_| malformed())?;
    if w <= 0.0 || h <= 0.0 {
        return Err(malformed());
    }
    Ok(Some(w / h))
}

/// Parses `WIDTHxHEIGHT+X+Y`
#[cfg(feature = "imaging")]
fn parse_region(region: &str) -> Result<toolshed::canvas::CropRegion> {
    let malformed = || invalid(format!("invalid region \"{}\" (expected WIDTHxHEIGHT+X+Y)", region));
    let (size, offset) = region.split_once('+').ok_or_else(malformed)?;
    let (width, height) = size.split_once('x').ok_or_else(malformed)?;
    let (x, y) = offset.split_once('+').ok_or_else(malformed)?;
    let number = |value: &str| value.trim().parse::<u32>().map_err(|_| malformed());
    Ok(toolshed::canvas::CropRegion {
        x: number(x)?,
        y: number(y)?,
        width: number(width)?,
        height: number(height)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_operation_rejects_blank_text() {
        let registry = TransformRegistry::text();
        assert!(matches!(
            run_operation(&registry, "upper", String::new(), Options::new()),
            Err(Error::ValidationError(_))
        ));
        assert!(matches!(
            run_operation(&registry, "upper", " \n ".to_string(), Options::new()),
            Err(Error::ValidationError(_))
        ));
        assert_eq!(
            run_operation(&registry, "upper", "hi".to_string(), Options::new()).unwrap(),
            "HI"
        );
    }

    #[test]
    fn test_run_operation_numeric_options() {
        let registry = TransformRegistry::numeric();
        let options = Options::new().with(DECIMAL_PLACES_OPTION, 1);
        assert_eq!(
            run_operation(&registry, "comma", "1234.56".to_string(), options).unwrap(),
            "1,234.6"
        );
    }

    #[cfg(feature = "imaging")]
    #[test]
    fn test_parse_aspect() {
        assert_eq!(parse_aspect("original").unwrap(), None);
        assert_eq!(parse_aspect("2:1").unwrap(), Some(2.0));
        assert!(parse_aspect("16x9").is_err());
        assert!(parse_aspect("0:9").is_err());
    }

    #[cfg(feature = "imaging")]
    #[test]
    fn test_parse_region() {
        let region = parse_region("100x50+10+20").unwrap();
        assert_eq!((region.width, region.height, region.x, region.y), (100, 50, 10, 20));
        assert!(parse_region("100x50").is_err());
        assert!(parse_region("axb+1+2").is_err());
    }
}
