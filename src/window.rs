use {
    crate::meter::Meter,
    crossterm::{
        ExecutableCommand, QueueableCommand, cursor,
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
        style::{self, Stylize},
        terminal,
    },
    std::{
        io::{self, Write},
        time::Duration,
    },
    vitals::{Config, Metrics, Monitor, Reader, Sampler},
};

/// a live terminal readout of the latest metrics.
struct Window {
    reader: Reader,
}

/// samples in the background, and draws a readout until the user quits.
pub fn watch(config: &Config, refresh: Duration) -> anyhow::Result<()> {
    let monitor = Monitor::spawn(Sampler::new(config), config.interval)?;
    let window = Window {
        reader: monitor.reader(),
    };

    Window::setup()?;
    let result = window.run(refresh);
    let restored = Window::restore();
    monitor.stop();

    result.and(restored).map_err(Into::into)
}

/// a one-line summary of `metrics`.
pub fn summary(metrics: &Metrics) -> String {
    let [one, five, fifteen] = metrics.load_average();
    format!(
        "cpu {:.1}% mem {:.1}% ({:.2} GiB) net rx {} tx {} disk r {} w {} load {one:.2} {five:.2} {fifteen:.2} procs {} up {}",
        metrics.cpu_usage_pct(),
        metrics.memory_usage_pct(),
        metrics.memory_used_gb(),
        format_rate(metrics.network_rx_rate()),
        format_rate(metrics.network_tx_rate()),
        format_rate(metrics.disk_read_rate()),
        format_rate(metrics.disk_write_rate()),
        metrics.process_count(),
        format_uptime(metrics.uptime_seconds()),
    )
}

/// formats a rate in bytes per second.
pub fn format_rate(bytes_per_sec: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    match bytes_per_sec {
        r if r >= GIB => format!("{:.1} GiB/s", r / GIB),
        r if r >= MIB => format!("{:.1} MiB/s", r / MIB),
        r if r >= KIB => format!("{:.1} KiB/s", r / KIB),
        r => format!("{r:.0} B/s"),
    }
}

/// formats whole seconds as days, hours, and minutes.
pub fn format_uptime(seconds: u64) -> String {
    let (days, hours, minutes) = (seconds / 86400, seconds % 86400 / 3600, seconds % 3600 / 60);
    match (days, hours) {
        (0, 0) => format!("{minutes}m"),
        (0, hours) => format!("{hours}h {minutes}m"),
        (days, hours) => format!("{days}d {hours}h {minutes}m"),
    }
}

// === impl Window ===

impl Window {
    const METER_WIDTH: usize = 40;

    fn run(&self, refresh: Duration) -> io::Result<()> {
        loop {
            self.draw(&self.reader.latest())?;

            // waiting on input doubles as the refresh timer.
            if event::poll(refresh)? {
                if let Event::Key(key) = event::read()? {
                    if Self::is_quit(key) {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn is_quit(KeyEvent {
        code,
        modifiers,
        kind,
        ..
    }: KeyEvent) -> bool {
        kind == KeyEventKind::Press
            && match code {
                KeyCode::Char('q') | KeyCode::Esc => true,
                KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
                _ => false,
            }
    }

    fn draw(&self, metrics: &Metrics) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.queue(terminal::Clear(terminal::ClearType::All))?;

        stdout
            .queue(cursor::MoveTo(1, 0))?
            .queue(style::PrintStyledContent("vitals (q to quit)".grey()))?;

        let meters = [
            ("cpu", metrics.cpu_usage_pct(), (70.0, 90.0), String::new()),
            (
                "memory",
                metrics.memory_usage_pct(),
                (80.0, 95.0),
                format!(" {:.2} GiB", metrics.memory_used_gb()),
            ),
        ];
        for (row, (name, percentage, (warning, critical), extra)) in (2..).zip(meters) {
            stdout.queue(cursor::MoveTo(1, row))?;
            Meter {
                name,
                percentage,
                width: Self::METER_WIDTH,
            }
            .draw(&mut stdout)?;

            let label = format!(" {percentage:5.1}%");
            let label = match percentage {
                p if p >= critical => label.red(),
                p if p >= warning => label.yellow(),
                _ => label.green(),
            };
            stdout
                .queue(style::PrintStyledContent(label))?
                .queue(style::Print(extra))?;
        }

        let [one, five, fifteen] = metrics.load_average();
        let lines = [
            format!(
                "network rx {}  tx {}",
                format_rate(metrics.network_rx_rate()),
                format_rate(metrics.network_tx_rate())
            ),
            format!(
                "disk    read {}  write {}",
                format_rate(metrics.disk_read_rate()),
                format_rate(metrics.disk_write_rate())
            ),
            format!("load    {one:.2} {five:.2} {fifteen:.2}"),
            format!("procs   {}", metrics.process_count()),
            format!("uptime  {}", format_uptime(metrics.uptime_seconds())),
        ];
        for (row, line) in (5..).zip(lines) {
            stdout
                .queue(cursor::MoveTo(1, row))?
                .queue(style::Print(line))?;
        }

        stdout.flush()
    }

    fn setup() -> io::Result<()> {
        terminal::enable_raw_mode()?;
        io::stdout()
            .execute(terminal::EnterAlternateScreen)?
            .execute(cursor::Hide)
            .map(drop)
    }

    fn restore() -> io::Result<()> {
        io::stdout()
            .execute(cursor::Show)?
            .execute(terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }
}
