use std::path::PathBuf;

use clap::{
    arg,
    builder::{styling::AnsiColor, Styles},
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, ColorChoice,
    Command,
};

fn env_no_color() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|x| !x.is_empty())
}

// Builds the application command line interface defining the commands, subcommands
// and arguments
pub fn build_app(interactive_output: bool) -> Command {
    let color_when = if interactive_output && !env_no_color() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Green.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default());

    let app = Command::new(crate_name!())
        .styles(styles)
        .version(crate_version!())
        .about(crate_description!())
        .color(color_when)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            arg!(--copy "Copies the result to the clipboard.")
                .long_help(
                    "Copies the result to the system clipboard using the first available \
                     utility among pbcopy, wl-copy, xclip, xsel and clip.",
                )
                .global(true),
        )
        .arg(
            arg!(-o --output [FILE] "Saves the result to a file.")
                .long_help(
                    "Saves the result to the given file inside the output directory \
                     (files.output_dir in the configuration). When no file name is given, \
                     a name suggested by the tool is used.",
                )
                .default_missing_value("")
                .global(true),
        )
        .arg(arg!(-q --quiet "Hides informational notices.").global(true))
        .subcommand(build_case_command())
        .subcommand(build_format_command())
        .subcommand(
            Command::new("number")
                .about("Formats numbers (one per line).")
                .args(input_args())
                .arg(
                    arg!(-s --style <STYLE> "Number style")
                        .value_parser(["comma", "indian", "scientific", "currency"]),
                )
                .arg(
                    arg!(-d --decimals <N> "Decimal places (0-8)")
                        .value_parser(value_parser!(u8).range(0..=8)),
                ),
        )
        .subcommand(
            Command::new("stats")
                .about("Counts characters, words, sentences and lines.")
                .args(input_args()),
        )
        .subcommand(build_lorem_command())
        .subcommand(build_password_command())
        .subcommand(build_uuid_command())
        .subcommand(build_random_command())
        .subcommand(build_color_command())
        .subcommand(build_gradient_command())
        .subcommand(build_json_command())
        .subcommand(build_todo_command())
        .subcommand(
            Command::new("timer")
                .about("Runs a countdown timer.")
                .arg(arg!(-H --hours <N> "Hours (0-99)").value_parser(value_parser!(u64).range(0..=99)))
                .arg(arg!(-M --minutes <N> "Minutes (0-59)").value_parser(value_parser!(u64).range(0..=59)))
                .arg(arg!(-S --seconds <N> "Seconds (0-59)").value_parser(value_parser!(u64).range(0..=59))),
        )
        .subcommand(
            Command::new("stopwatch")
                .about("Runs an interactive stopwatch.")
                .long_about(
                    "Starts a stopwatch reading commands from the standard input: \
                     an empty line records a lap, 'p' pauses or resumes, 'r' resets \
                     and 'q' stops.",
                ),
        )
        .subcommand(build_speak_command())
        .subcommand(
            Command::new("theme")
                .about("Shows or changes the color theme.")
                .arg(arg!([theme] "light, dark or toggle").value_parser(["light", "dark", "toggle"])),
        );

    #[cfg(feature = "fetcher")]
    let app = app
        .subcommand(build_joke_command())
        .subcommand(
            Command::new("grammar")
                .about("Fixes the grammar of a text using the generative text service.")
                .args(input_args()),
        )
        .subcommand(
            Command::new("comment")
                .about("Makes a comment more polite and engaging using the generative text service.")
                .args(input_args()),
        );

    #[cfg(feature = "imaging")]
    let app = app
        .subcommand(build_image_command())
        .subcommand(build_qr_command())
        .subcommand(build_avatar_command());

    app
}

/// Positional text plus the `--input` file alternative. Standard input is
/// read when neither is given.
fn input_args() -> [Arg; 2] {
    [
        arg!([text] "Text to process (reads the standard input if missing)"),
        arg!(-i --input <FILE> "Reads the text from a file")
            .value_parser(value_parser!(PathBuf))
            .conflicts_with("text"),
    ]
}

fn build_case_command() -> Command {
    Command::new("case")
        .about("Converts the case of a text.")
        .long_about(
            "Converts the case of a text: upper, lower, title, sentence, reverse, \
             alternating, inverse, camel, kebab, snake or pascal.",
        )
        .arg(arg!([operation] "Case operation to apply").required_unless_present("list"))
        .args(input_args())
        .arg(arg!(-l --list "Lists the available operations"))
}

fn build_format_command() -> Command {
    Command::new("format")
        .about("Cleans up a text.")
        .long_about(
            "Applies a text formatting operation: remove-spaces, remove-line-breaks, \
             remove-duplicates, trim-lines or slugify.",
        )
        .arg(arg!([operation] "Format operation to apply").required_unless_present("list"))
        .args(input_args())
        .arg(arg!(-l --list "Lists the available operations"))
}

fn build_lorem_command() -> Command {
    Command::new("lorem")
        .about("Generates placeholder text.")
        .arg(
            arg!(-u --unit <UNIT> "Unit to generate")
                .value_parser(["words", "sentences", "paragraphs"]),
        )
        .arg(arg!(-n --count <N> "Number of units").value_parser(value_parser!(usize)))
        .arg(arg!(--"no-lorem" "Do not start with \"Lorem ipsum\""))
        .arg(arg!(--html "Wraps paragraphs in <p> tags"))
}

fn build_password_command() -> Command {
    Command::new("password")
        .about("Generates a random password.")
        .arg(
            arg!(-l --length <N> "Password length (4-128)")
                .value_parser(value_parser!(usize)),
        )
        .arg(arg!(--"no-lower" "Excludes lowercase letters"))
        .arg(arg!(--"no-upper" "Excludes uppercase letters"))
        .arg(arg!(--"no-digits" "Excludes digits"))
        .arg(arg!(--"no-symbols" "Excludes symbols"))
        .arg(arg!(-x --exclude <CHARS> "Characters never used"))
}

fn build_uuid_command() -> Command {
    Command::new("uuid")
        .about("Generates UUIDs.")
        .arg(
            Arg::new("uuid_version")
                .short('v')
                .long("version")
                .value_name("VERSION")
                .help("UUID version (v1, v4 or v5)")
                .value_parser(["v1", "v4", "v5", "1", "4", "5"]),
        )
        .arg(arg!(-n --count <N> "Number of UUIDs (1-100)").value_parser(value_parser!(usize)))
        .arg(
            arg!(--namespace <NS> "Namespace of v5 UUIDs")
                .long_help("A UUID or one of the predefined namespaces: dns, url, oid, x500."),
        )
        .arg(arg!(--name <NAME> "Name of v5 UUIDs"))
        .arg(arg!(--"no-hyphens" "Removes the hyphens"))
        .arg(arg!(--uppercase "Uses uppercase hexadecimal digits"))
}

fn build_random_command() -> Command {
    Command::new("random")
        .about("Generates random integers.")
        .arg(
            arg!(--min <N> "Lower bound (inclusive)")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            arg!(--max <N> "Upper bound (inclusive)")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            arg!(-n --quantity <N> "How many numbers (1-1000)")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            arg!(--settings <FILE> "Loads min,max,quantity from a file")
                .value_parser(value_parser!(PathBuf)),
        )
}

fn build_color_command() -> Command {
    Command::new("color")
        .about("Converts a color between formats.")
        .arg(arg!([color] "Hex, rgb(), hsl(), hsv() or CSS name"))
        .arg(arg!(--random "Uses a random color").conflicts_with("color"))
        .arg(arg!(--pick "Asks for the color interactively").conflicts_with_all(["color", "random"]))
        .arg(arg!(--json "Prints the conversions as JSON"))
}

fn build_gradient_command() -> Command {
    Command::new("gradient")
        .about("Builds a CSS gradient.")
        .arg(
            arg!([stops] ... "Color stops as COLOR or COLOR:POSITION")
                .long_help(
                    "Color stops as COLOR or COLOR:POSITION (0-100). Positions default to \
                     evenly spaced values. Between 2 and 8 stops are accepted.",
                ),
        )
        .arg(arg!(-t --type <TYPE> "Gradient type").value_parser(["linear", "radial"]))
        .arg(
            arg!(-a --angle <DEG> "Angle of linear gradients")
                .value_parser(value_parser!(u16).range(0..=360)),
        )
        .arg(
            arg!(--load <FILE> "Loads a gradient configuration (JSON)")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("stops"),
        )
        .arg(arg!(--json "Prints the gradient configuration as JSON"))
}

fn build_json_command() -> Command {
    let json_cmd = |name: &'static str, about: &'static str| {
        Command::new(name).about(about).args(input_args())
    };
    Command::new("json")
        .about("Formats, validates and converts JSON.")
        .subcommand_required(true)
        .subcommand(
            json_cmd("format", "Pretty prints JSON.").arg(
                arg!(--indent <N> "Indentation (0 for compact)")
                    .value_parser(value_parser!(usize)),
            ),
        )
        .subcommand(json_cmd("minify", "Removes all insignificant whitespace."))
        .subcommand(json_cmd("validate", "Checks the JSON is valid."))
        .subcommand(
            json_cmd("csv", "Converts JSON to CSV.")
                .arg(arg!(--delimiter <C> "Field delimiter (a character or \"tab\")")),
        )
}

fn build_todo_command() -> Command {
    Command::new("todo")
        .about("Manages a todo list.")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Adds a todo.")
                .arg(arg!(<text> ... "The todo text"))
                .arg(arg!(-c --category <NAME> "Category"))
                .arg(
                    arg!(-p --priority <PRIORITY> "Priority")
                        .value_parser(["low", "medium", "high"]),
                ),
        )
        .subcommand(
            Command::new("list")
                .alias("ls")
                .about("Lists the todos.")
                .arg(
                    arg!(-f --filter <FILTER> "Which todos to show")
                        .value_parser(["all", "active", "completed"]),
                )
                .arg(arg!(-c --category <NAME> "Only todos of this category")),
        )
        .subcommand(
            Command::new("done")
                .about("Toggles the completion of a todo.")
                .arg(arg!(<id> "Todo id").value_parser(value_parser!(u64))),
        )
        .subcommand(
            Command::new("rm")
                .alias("remove")
                .about("Deletes a todo.")
                .arg(arg!(<id> "Todo id").value_parser(value_parser!(u64))),
        )
        .subcommand(
            Command::new("edit")
                .about("Changes the text of a todo.")
                .arg(arg!(<id> "Todo id").value_parser(value_parser!(u64)))
                .arg(arg!(<text> ... "The new text")),
        )
        .subcommand(
            Command::new("priority")
                .about("Changes the priority of a todo.")
                .arg(arg!(<id> "Todo id").value_parser(value_parser!(u64)))
                .arg(arg!(<priority> "New priority").value_parser(["low", "medium", "high"])),
        )
        .subcommand(
            Command::new("category")
                .about("Adds a category.")
                .arg(arg!(<name> "Category name")),
        )
        .subcommand(Command::new("clear").about("Removes the completed todos."))
        .subcommand(Command::new("export").about("Prints the todos as JSON."))
        .subcommand(
            Command::new("import")
                .about("Imports todos from a JSON export.")
                .arg(arg!(<file> "JSON file").value_parser(value_parser!(PathBuf))),
        )
}

fn build_speak_command() -> Command {
    Command::new("speak")
        .about("Reads a text aloud.")
        .args(input_args())
        .arg(arg!(--rate <R> "Speech rate (0.5-2)").value_parser(value_parser!(f32)))
        .arg(arg!(--pitch <P> "Pitch (0.5-2)").value_parser(value_parser!(f32)))
        .arg(arg!(--volume <V> "Volume (0-1)").value_parser(value_parser!(f32)))
        .arg(arg!(--voice <VOICE> "Voice name"))
        .arg(arg!(--voices "Lists the available voices").action(ArgAction::SetTrue))
}

#[cfg(feature = "fetcher")]
fn build_joke_command() -> Command {
    Command::new("joke")
        .about("Tells a random dad joke.")
        .arg(arg!(--save "Adds the joke to the favorites"))
        .arg(arg!(--favorites "Lists the favorite jokes").conflicts_with("save"))
        .arg(
            arg!(--import <FILE> "Replaces the favorites with a JSON export")
                .value_parser(value_parser!(PathBuf)),
        )
}

#[cfg(feature = "imaging")]
fn build_image_command() -> Command {
    let image_arg = || {
        arg!(<image> "Image file (max 10MB)").value_parser(value_parser!(PathBuf))
    };
    let format_args = || {
        [
            arg!(-f --format <FORMAT> "Output format").value_parser(["png", "jpeg", "jpg"]),
            arg!(--quality <Q> "JPEG quality (1-100)")
                .value_parser(value_parser!(u8).range(1..=100)),
        ]
    };
    Command::new("image")
        .about("Crops, resizes and shapes images.")
        .subcommand_required(true)
        .subcommand(
            Command::new("crop")
                .about("Crops an image.")
                .arg(image_arg())
                .arg(
                    arg!(--aspect <RATIO> "Centered crop with this aspect ratio (16:9, 1:1, original...)")
                        .conflicts_with("region"),
                )
                .arg(arg!(--region <REGION> "Pixel region as WIDTHxHEIGHT+X+Y"))
                .args(format_args()),
        )
        .subcommand(
            Command::new("resize")
                .about("Resizes an image.")
                .arg(image_arg())
                .arg(arg!(-W --width <PX> "Target width").value_parser(value_parser!(u32)))
                .arg(arg!(-H --height <PX> "Target height").value_parser(value_parser!(u32)))
                .arg(arg!(--stretch "Ignores the original aspect ratio"))
                .args(format_args()),
        )
        .subcommand(
            Command::new("shape")
                .about("Masks an image with a shape (PNG output).")
                .arg(image_arg())
                .arg(
                    arg!(-s --shape <SHAPE> "Shape")
                        .value_parser(["square", "circle", "rounded"]),
                )
                .arg(arg!(--radius <PX> "Corner radius of rounded shapes").value_parser(value_parser!(u32))),
        )
}

#[cfg(feature = "imaging")]
fn build_qr_command() -> Command {
    use toolshed::constants::qr::*;

    Command::new("qr")
        .about("Encodes text or a URL as a QR code (PNG output).")
        .args(input_args())
        .arg(
            arg!(--size <PX> "Image side in pixels (100-500)")
                .value_parser(value_parser!(u32).range(MIN_SIZE as i64..=MAX_SIZE as i64)),
        )
        .arg(
            arg!(--margin <MODULES> "Quiet zone in modules (0-5)")
                .value_parser(value_parser!(u32).range(0..=MAX_MARGIN as i64)),
        )
        .arg(arg!(--dark <COLOR> "Color of the dark modules").default_value(DEFAULT_DARK))
        .arg(arg!(--light <COLOR> "Background color").default_value(DEFAULT_LIGHT))
        .arg(
            arg!(--level <LEVEL> "Error correction: L (7%), M (15%), Q (25%) or H (30%)")
                .value_parser(["L", "M", "Q", "H"])
                .ignore_case(true)
                .default_value("M"),
        )
}

#[cfg(feature = "imaging")]
fn build_avatar_command() -> Command {
    use toolshed::constants::avatar::*;

    Command::new("avatar")
        .about("Draws the initials of a name as a profile picture (PNG output).")
        .arg(arg!([name] "Full name (reads the standard input if missing)"))
        .arg(
            arg!(-i --input <FILE> "Reads the name from a file")
                .value_parser(value_parser!(PathBuf))
                .conflicts_with("name"),
        )
        .arg(
            arg!(--size <PX> "Image side in pixels (50-500)")
                .value_parser(value_parser!(u32).range(MIN_SIZE as i64..=MAX_SIZE as i64)),
        )
        .arg(
            arg!(--"font-size" <PX> "Letter size in pixels (12-144)")
                .value_parser(value_parser!(u32).range(MIN_FONT_SIZE as i64..=MAX_FONT_SIZE as i64)),
        )
        .arg(arg!(--background <COLOR> "Background color").conflicts_with("random-color"))
        .arg(arg!(--"random-color" "Uses a random background color"))
        .arg(
            arg!(--style <SHAPE> "Image shape")
                .value_parser(["square", "circle", "rounded"])
                .default_value("square"),
        )
}
