use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use datespan::model::{DateValue, PickerConfig, SelectionRange};
use datespan::tui::{Picker, PickerResponse, SavedRange, input, render};

#[derive(Parser)]
#[command(
    name = "datespan",
    about = concat!("datespan v", env!("CARGO_PKG_VERSION"), " - date range picker demo"),
    version
)]
struct Cli {
    /// Seed value for the start field, e.g. 2024-01-15 or 2024-01-15T14:30:00
    #[arg(long)]
    start: Option<String>,

    /// Seed value for the due field
    #[arg(long)]
    due: Option<String>,

    /// Config file path
    #[arg(long, default_value = "datespan.toml")]
    config: PathBuf,

    /// Place the picker statically instead of anchoring it to the demo row
    #[arg(long)]
    inline: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = PickerConfig::load(&cli.config)?;
    // Resolved once; the picker session keeps this "today" throughout
    let today = chrono::Local::now().date_naive();
    let trigger = (!cli.inline).then(|| Rect::new(4, 2, 36, 1));
    let mut picker = Picker::open(
        cli.start.as_deref(),
        cli.due.as_deref(),
        None,
        trigger,
        &config,
        today,
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut picker, trigger);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Some(saved) = result? {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    }
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    picker: &mut Picker,
    trigger: Option<Rect>,
) -> Result<Option<SavedRange>, Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            draw_host_row(frame, picker, trigger);
            render::render_picker(frame, picker);
        })?;

        // The picker is purely event-driven; block until something happens
        let response = match event::read()? {
            Event::Key(key) => input::handle_key(picker, key),
            Event::Mouse(mouse) => input::handle_mouse(picker, mouse),
            _ => None,
        };
        match response {
            Some(PickerResponse::Saved(saved)) => return Ok(Some(saved)),
            Some(PickerResponse::Closed) => return Ok(None),
            None => {}
        }
    }
}

/// The fake task row the picker anchors to. Shows the live selection so
/// drags are visible outside the popup too.
fn draw_host_row(frame: &mut Frame, picker: &Picker, trigger: Option<Rect>) {
    let Some(trigger) = trigger else {
        return;
    };
    let area = trigger.intersection(frame.area());
    if area.width == 0 || area.height == 0 {
        return;
    }
    let theme = &picker.theme;
    let line = Line::from(vec![
        Span::styled(" Ship the release  ", Style::default().fg(theme.text)),
        Span::styled(
            range_chip(&picker.selection.range),
            Style::default().fg(theme.highlight),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn range_chip(range: &SelectionRange) -> String {
    let fmt = |v: DateValue| v.date().format("%b %-d").to_string();
    match (range.start, range.due) {
        (Some(s), Some(d)) => format!("{} - {}", fmt(s), fmt(d)),
        (Some(s), None) => format!("from {}", fmt(s)),
        (None, Some(d)) => format!("by {}", fmt(d)),
        (None, None) => "no dates".to_string(),
    }
}
