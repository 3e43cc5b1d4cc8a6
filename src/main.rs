//! Panelkit demo
//!
//! A main menu that opens each kind of dialog. The input example keeps its
//! answer in a shared slot; whatever ends up there is shown on the way out.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use panelkit::ui::panel;
use panelkit::ui::Widget;
use panelkit::{
    Canvas, Error, InputBox, Menu, MenuEntry, MessageBox, ModalSession, MultiSelectionBox, Result, Settings,
    ShellBox, SingleSelectionBox, Terminal, YesNoBox,
};

/// Pause between frames of the drifting message
const DRIFT_STEP: Duration = Duration::from_millis(60);

const FRUIT: [&str; 5] = ["Apple", "Banana", "Cherry", "Damson", "Elderberry"];

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "panelkit-demo")]
#[command(about = "Tour of the panelkit dialogs")]
#[command(version)]
struct Cli {
    /// Command for the Shell entry (default: $SHELL, then /bin/sh)
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    shell: Vec<String>,

    /// Longest value the input example accepts
    #[arg(long, default_value_t = 20)]
    input_width: usize,

    /// Shell output poll interval in milliseconds
    #[arg(long, default_value_t = 50)]
    poll_ms: u64,

    /// Append logs to this file; nothing is logged without it
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error) when PANELKIT_LOG is unset
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn shell_command(&self) -> Vec<String> {
        if !self.shell.is_empty() {
            return self.shell.clone();
        }
        let shell = std::env::var("SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "/bin/sh".to_string());
        vec![shell]
    }
}

/// Logs go to a file: the terminal belongs to the dialogs
fn init_logging(cli: &Cli) -> std::io::Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env("PANELKIT_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("panelkit={}", cli.log_level.to_lowercase())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn input_example(canvas: &mut Canvas, sink: &RefCell<Option<String>>, width: usize) -> Result<()> {
    let default = sink.borrow().clone().unwrap_or_default();
    let value = InputBox::new("Input Example", &default, width)
        .with_message("Type a value:")
        .show(canvas)?;
    let keep = YesNoBox::new("Confirm", &format!("Keep \"{value}\"?"))
        .with_default(true)
        .show(canvas)?;
    if keep {
        info!(%value, "value stored");
        *sink.borrow_mut() = Some(value);
    }
    Ok(())
}

fn pick_one(canvas: &mut Canvas) -> Result<()> {
    let answer = SingleSelectionBox::new("Pick one", "Space or arrows choose", FRUIT).show(canvas)?;
    let message = match answer {
        Some(fruit) => format!("You picked {fruit}."),
        None => "Cancelled.".to_string(),
    };
    MessageBox::new("Pick one", &message).show(canvas)
}

fn pick_several(canvas: &mut Canvas) -> Result<()> {
    let answer = MultiSelectionBox::new("Pick several", "Space checks an item", FRUIT).show(canvas)?;
    let message = if answer.cancelled {
        "Cancelled.".to_string()
    } else if answer.selected.is_empty() {
        "Nothing picked.".to_string()
    } else {
        format!("You picked {}.", answer.selected.join(", "))
    };
    MessageBox::new("Pick several", &message).show(canvas)
}

/// Slide a message box around a rectangle, then show it centered
fn drifting_message(canvas: &mut Canvas) -> Result<()> {
    let mut message = MessageBox::new("Drifting", "Round and round");
    let rect = message.layout(canvas.bounds())?;
    {
        let mut session = ModalSession::open(canvas, rect, false);
        let path = std::iter::repeat((0, 2))
            .take(8)
            .chain(std::iter::repeat((1, 0)).take(4))
            .chain(std::iter::repeat((0, -2)).take(16))
            .chain(std::iter::repeat((-1, 0)).take(8))
            .chain(std::iter::repeat((0, 2)).take(8))
            .chain(std::iter::repeat((1, 0)).take(4));
        for (dy, dx) in path {
            let parent = session.bounds();
            message.nudge(dy, dx, parent)?;
            panel::draw(&mut session, &message)?;
            thread::sleep(DRIFT_STEP);
        }
    }
    message.base_mut().recenter();
    message.show(canvas)
}

fn run(cli: &Cli) -> Result<()> {
    let settings = Settings::default().with_poll_interval(Duration::from_millis(cli.poll_ms.max(1)));
    let mut canvas = Canvas::new(Terminal::new()?).with_settings(settings);
    let stored: Rc<RefCell<Option<String>>> = Rc::default();

    {
        let sink = Rc::clone(&stored);
        let width = cli.input_width;
        let shell = cli.shell_command();
        let title = format!("Panelkit Examples, v{}", env!("CARGO_PKG_VERSION"));
        let mut menu = Menu::new(
            title,
            "Main Menu Options",
            vec![
                MenuEntry::new("Input Example", move |canvas: &mut Canvas| {
                    input_example(canvas, &sink, width)
                }),
                MenuEntry::new("Pick one", pick_one),
                MenuEntry::new("Pick several", pick_several),
                MenuEntry::new("Shell", move |canvas: &mut Canvas| {
                    ShellBox::new("Shell (exit to return)", shell.clone()).show(canvas)
                }),
                MenuEntry::new("Drifting message", drifting_message),
                MenuEntry::exit("Soft menu break"),
                MenuEntry::new("Hard exit", |_canvas: &mut Canvas| Err(Error::Aborted)),
            ],
        );
        menu.show(&mut canvas)?;
    }

    let value = stored.borrow().clone();
    match value {
        Some(value) => MessageBox::new("Stored value", &format!("You entered: {value}")).show(&mut canvas),
        None => MessageBox::new("Warning", "You didn't select a value!").show(&mut canvas),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        eprintln!("panelkit-demo: cannot open log file: {err}");
        return ExitCode::FAILURE;
    }
    info!(version = env!("CARGO_PKG_VERSION"), "demo starting");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Aborted) => {
            info!("hard exit");
            ExitCode::SUCCESS
        }
        Err(err) => {
            warn!(%err, "demo failed");
            eprintln!("panelkit-demo: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_shell_takes_arguments() {
        let cli = Cli::try_parse_from(["panelkit-demo", "--input-width", "8", "--shell", "bash", "-l"]).unwrap();
        assert_eq!(cli.shell_command(), vec!["bash", "-l"]);
        assert_eq!(cli.input_width, 8);
        assert_eq!(cli.poll_ms, 50);
        assert!(cli.log_file.is_none());
    }
}
