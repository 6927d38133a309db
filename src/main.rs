mod app;
mod config;
mod dates;
mod error;
mod grid;
mod help;
mod holidays;
mod jumpto;
mod logging;
mod sheetview;
mod theme;
use crate::app::App;
use crate::config::Config;
use crate::dates::TargetYear;
use crate::grid::{render_month_grid, render_strip, LayoutMode, Sheet};
use crate::holidays::{aggregate_year, JsonDataset};
use crate::sheetview::plain_lines;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::OffsetDateTime;
use tracing::debug;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunArgs {
    data: Option<PathBuf>,
    config: Option<PathBuf>,
    year: Option<i32>,
    countries: Vec<String>,
    primary: Option<String>,
    language: Option<String>,
    month_grid: bool,
    print: bool,
    verbosity: u8,
}

impl RunArgs {
    /// Overrides the file's settings with those given on the command line
    fn apply(&self, config: &mut Config) {
        if let Some(data) = &self.data {
            config.data = Some(data.clone());
        }
        if let Some(year) = self.year {
            config.year = Some(year);
        }
        if !self.countries.is_empty() {
            config.countries.clone_from(&self.countries);
        }
        if let Some(primary) = &self.primary {
            config.primary.clone_from(primary);
        }
        if let Some(language) = &self.language {
            config.language.clone_from(language);
        }
        if self.month_grid {
            config.layout.mode = LayoutMode::MonthGrid;
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunArgs),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = RunArgs::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('y') | Arg::Long("year") => {
                    args.year = Some(parser.value()?.parse()?);
                }
                Arg::Short('C') | Arg::Long("country") => {
                    args.countries.push(parser.value()?.string()?);
                }
                Arg::Short('p') | Arg::Long("primary") => {
                    args.primary = Some(parser.value()?.string()?);
                }
                Arg::Short('l') | Arg::Long("language") => {
                    args.language = Some(parser.value()?.string()?);
                }
                Arg::Short('m') | Arg::Long("month-grid") => args.month_grid = true,
                Arg::Short('P') | Arg::Long("print") => args.print = true,
                Arg::Short('v') | Arg::Long("verbose") => {
                    args.verbosity = args.verbosity.saturating_add(1);
                }
                Arg::Value(value) if args.data.is_none() => {
                    args.data = Some(PathBuf::from(value));
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(args) => {
                let mut config = match &args.config {
                    Some(path) => Config::load(path)?,
                    None => Config::default(),
                };
                args.apply(&mut config);
                let year = match config.year {
                    Some(year) => year,
                    None => {
                        OffsetDateTime::now_local()
                            .context("failed to determine local date")?
                            .year()
                    }
                };
                logging::init(args.verbosity);
                let year = TargetYear::new(year)?;
                let path = config.data.as_deref().context(
                    "no holiday dataset given: pass a DATA path or set `data` in the config file",
                )?;
                let dataset = JsonDataset::open(path).with_context(|| {
                    format!("failed to load holiday dataset: {}", path.display())
                })?;
                let index = aggregate_year(&dataset, year, &config.all_countries())
                    .context("failed to aggregate holidays")?;
                let mode = config.layout.mode;
                let mut sheet = Sheet::new();
                match mode {
                    LayoutMode::Strip => render_strip(
                        &index,
                        &config.strip_options(),
                        config.compose_mode(),
                        &mut sheet,
                    ),
                    LayoutMode::MonthGrid => render_month_grid(
                        &index,
                        &config.month_grid_options(),
                        config.compose_mode(),
                        &mut sheet,
                    ),
                }
                .context("failed to lay out holidays")?;
                debug!(
                    rows = sheet.row_count(),
                    cols = sheet.col_count(),
                    writes = sheet.write_count(),
                    styles = sheet.style_count(),
                    "Sheet ready"
                );
                if args.print {
                    for line in plain_lines(&sheet) {
                        println!("{line}");
                    }
                    Ok(())
                } else {
                    with_terminal(|mut terminal| {
                        terminal.hide_cursor().context("failed to hide cursor")?;
                        App::new(sheet, year, mode).run(&mut terminal)?;
                        Ok(())
                    })
                }
            }
            Command::Help => {
                println!("Usage: holidaygrid [options] [DATA]");
                println!();
                println!("Year-at-a-glance grid of public & school holidays across regions and countries");
                println!();
                println!("Options:");
                println!("  -c, --config FILE       Read settings from a TOML file");
                println!("  -y, --year YEAR         Show YEAR [default: the current year]");
                println!("  -C, --country CODE      Load holidays for country CODE; may be repeated");
                println!("  -p, --primary CODE      Show CODE's regions one per row");
                println!("  -l, --language CODE     Language for region names");
                println!("  -m, --month-grid        Lay the year out as twelve month columns");
                println!("  -P, --print             Print the sheet as plain text instead of");
                println!("                          opening the viewer");
                println!("  -v, --verbose           Log more; may be repeated");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
