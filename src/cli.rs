use std::process;
use std::time::Duration;

use chrono::NaiveDate;
use getopts::Options;

use da_calendar::output::{Format, Target};
use da_calendar::site::DEFAULT_CALENDAR_ID;

pub struct Args {
    pub output: Target,
    pub format: Format,
    pub verbose: bool,
    pub start: Option<NaiveDate>,
    pub calendar_id: u32,
    pub timeout: Duration,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optopt(
        "o",
        "output",
        "Output file, `-` for stdout [Default: calendar.json]",
        "FILE",
    );
    opts.optflag("v", "verbose", "Verbose output");
    opts.optopt("f", "format", "Output format, json or ics [Default: json]", "FORMAT");
    opts.optopt(
        "s",
        "start",
        "First month to retrieve [Default: current month]",
        "YYYY-MM",
    );
    opts.optopt(
        "c",
        "calendar-id",
        "Calendar widget id [Default: 12100]",
        "ID",
    );
    opts.optopt(
        "t",
        "timeout",
        "Timeout for each HTTP request [Default: 30]",
        "SECONDS",
    );
    opts
}

fn parse_month(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM: {err}"))
}

fn fail(message: String) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    let matches = match opts.parse(args) {
        Ok(matches) => matches,
        Err(fail) => {
            eprintln!("{fail}");
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        println!("{}", opts.usage(&opts.short_usage(env!("CARGO_PKG_NAME"))));
        process::exit(0);
    }

    let output = matches
        .opt_str("output")
        .map_or(Target::File("calendar.json".into()), |value| {
            Target::from(value.as_str())
        });

    let format = match matches.opt_get_default("format", Format::Json) {
        Ok(format) => format,
        Err(err) => fail(format!("Provided value for option 'format' is invalid: {err}")),
    };

    let start = match matches.opt_str("start").map(|value| parse_month(&value)) {
        None => None,
        Some(Ok(start)) => Some(start),
        Some(Err(err)) => fail(format!("Provided value for option 'start' is invalid: {err}")),
    };

    let calendar_id = match matches.opt_get_default("calendar-id", DEFAULT_CALENDAR_ID) {
        Ok(id) => id,
        Err(err) => fail(format!("Provided value for option 'calendar-id' is invalid: {err}")),
    };

    let timeout = match matches.opt_get_default("timeout", 30) {
        Ok(secs) => Duration::from_secs(secs),
        Err(err) => fail(format!("Provided value for option 'timeout' is invalid: {err}")),
    };

    Args {
        output,
        format,
        verbose: matches.opt_present("verbose"),
        start,
        calendar_id,
        timeout,
    }
}
