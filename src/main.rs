use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gocab_booking::components::booking::{ScreenOptions, ScreenSnapshot};
use gocab_booking::components::calendar::{CalendarDay, DateRangeSelector, SelectionMode, SelectionState};
use gocab_booking::components::shifts::{Direction, ShiftId};
use gocab_booking::config::Config;
use gocab_booking::error::Error;
use gocab_booking::{shutdown, startup};
use gocab_booking::utils::i18n::translate;
use tracing::info;

#[derive(Parser)]
#[command(name = "gocab-book")]
#[command(version)]
#[command(about = "Book employee cab shifts from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bookable calendar window
    Window,
    /// Select dates, look up common shifts and optionally book one
    Book {
        /// in (home to office) or out (office to home)
        #[arg(short, long, default_value = "in")]
        direction: Direction,

        /// single, multiple or range
        #[arg(short, long, default_value = "multiple")]
        mode: SelectionMode,

        /// Shift to book instead of the first one offered
        #[arg(short, long)]
        shift: Option<ShiftId>,

        /// Send the booking after the lookup
        #[arg(long)]
        submit: bool,

        /// Dates to tap, in order (YYYY-MM-DD)
        #[arg(required = true)]
        dates: Vec<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let cli = Cli::parse();

    // Load configuration
    let config = startup::load_config()?;

    match cli.command {
        Commands::Window => print_window(&config)?,
        Commands::Book {
            direction,
            mode,
            shift,
            submit,
            dates,
        } => {
            // Dropping the screen handle on a signal stops its actor
            tokio::select! {
                result = book(&config, direction, mode, shift, submit, &dates) => result?,
                signal = shutdown::wait_for_signal() => {
                    signal.map_err(Error::from)?;
                    info!("Booking interrupted");
                }
            }
        }
    }

    Ok(())
}

fn print_window(config: &Config) -> miette::Result<()> {
    let options = ScreenOptions::from_config(config)?;
    let selector = DateRangeSelector::with_holidays(options.today.date(), options.holidays);

    for day in selector.generate_window(&SelectionState::default()) {
        println!("{}", format_day(&day));
    }
    Ok(())
}

fn format_day(day: &CalendarDay) -> String {
    let note = if day.is_holiday {
        "holiday"
    } else if day.is_weekend {
        "weekend"
    } else {
        ""
    };
    let marker = if day.is_selected { "*" } else { " " };
    format!("{} {} {} {}", marker, day.date, day.date.format("%a"), note)
        .trim_end()
        .to_string()
}

async fn book(
    config: &Config,
    direction: Direction,
    mode: SelectionMode,
    shift: Option<ShiftId>,
    submit: bool,
    dates: &[NaiveDate],
) -> miette::Result<()> {
    let screen = startup::open_screen(config)?;

    screen.set_mode(mode).await?;
    screen.set_direction(direction).await?;
    for date in dates {
        screen.select_date(*date).await?;
    }

    let snapshot = screen.wait_until_settled().await?;
    print_snapshot(&snapshot);

    if let Some(shift_id) = shift {
        screen.select_shift(shift_id).await?;
    }

    if submit {
        let snapshot = screen.snapshot().await?;
        if let Some(summary) = snapshot.summary() {
            info!("{}", summary);
        }
        match screen.submit().await {
            Ok(()) => println!("{}", translate("alerts.booking_confirmed")),
            Err(e) => {
                eprintln!("{}", e.user_message());
                screen.shutdown().await?;
                return Err(e.into());
            }
        }
    }

    screen.shutdown().await?;
    Ok(())
}

fn print_snapshot(snapshot: &ScreenSnapshot) {
    if let Some(alert) = &snapshot.last_alert {
        eprintln!("{}", alert);
    }

    let selected: Vec<String> = snapshot.selected_dates.iter().map(|d| d.to_string()).collect();
    println!("Selected: {}", selected.join(", "));

    if snapshot.shifts.is_empty() {
        println!("No shifts available");
    }
    for shift in &snapshot.shifts {
        let marker = if snapshot.selected_shift.as_ref() == Some(&shift.shift_id) {
            "*"
        } else {
            " "
        };
        println!(
            "{} [{}] {} ({})",
            marker, shift.shift_id, shift.shift_time, shift.pickup_type
        );
    }

    let matched: Vec<String> = snapshot.matched_dates.iter().map(|d| d.to_string()).collect();
    println!("Bookable: {}", matched.join(", "));

    if let Some(summary) = snapshot.summary() {
        println!("{}", summary);
    }
}
