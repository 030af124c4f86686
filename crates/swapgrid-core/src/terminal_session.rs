#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! RAII ownership of raw mode, the alternate screen, and mouse capture for
//! terminal front-ends of the grid. Dropping the [`TerminalSession`] (on
//! return, `?`, or panic unwinding) restores the terminal in reverse order of
//! enabling. A panic hook and, on Unix, a SIGINT/SIGTERM watcher perform the
//! same cleanup best-effort before the process goes away.
//!
//! Events are surfaced as [`TerminalEvent`]s: mouse reports are mapped to
//! [`PointerEvent`]s stamped with the instant they were read, and losing
//! focus becomes a pointer cancel so an in-flight drag always tears down.
//!
//! ```no_run
//! use swapgrid_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions {
//!     alternate_screen: true,
//!     mouse_capture: true,
//! })?;
//! // ... event loop ...
//! drop(session); // terminal restored
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crossterm::event as cte;

use crate::event::{PointerEvent, PointerKind};
use crate::geometry::Point;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Which terminal modes a session enables. All default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Switch to the alternate screen buffer.
    pub alternate_screen: bool,
    /// Report mouse presses, drags, and releases.
    pub mouse_capture: bool,
}

/// Keys the front-end cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Tab,
    /// Any other key.
    Other,
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
}

/// Canonical events read from the terminal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TerminalEvent {
    Pointer(PointerEvent),
    Key(KeyPress),
    Resize { width: u16, height: u16 },
}

/// A terminal session that owns raw mode and restores the terminal on drop.
///
/// Only one session should exist at a time.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    alternate_screen_enabled: bool,
    mouse_enabled: bool,
    focus_events_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested modes.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or any requested mode cannot be enabled.
    /// Modes enabled before the failure are restored when the partially
    /// built session is dropped.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        crate::info!("terminal raw mode enabled");

        let mut session = Self {
            options,
            alternate_screen_enabled: false,
            mouse_enabled: false,
            focus_events_enabled: false,
            #[cfg(unix)]
            signal_guard: Some(SignalGuard::new()?),
        };

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            crate::info!("alternate screen enabled");
        }

        if options.mouse_capture {
            crossterm::execute!(stdout, cte::EnableMouseCapture)?;
            session.mouse_enabled = true;
            // Focus reports let a drag end when the window loses focus
            // mid-gesture and the release never arrives.
            crossterm::execute!(stdout, cte::EnableFocusChange)?;
            session.focus_events_enabled = true;
            crate::info!("mouse capture enabled");
        }

        crossterm::execute!(stdout, crossterm::cursor::Hide)?;

        Ok(session)
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Poll for an event with a timeout.
    ///
    /// Returns `Ok(true)` if an event is available, `Ok(false)` on timeout.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        cte::poll(timeout)
    }

    /// Read the next event (blocking until available).
    ///
    /// Returns `Ok(None)` for reports with no canonical meaning (scrolls,
    /// key releases, pastes).
    pub fn read_event(&self) -> io::Result<Option<TerminalEvent>> {
        let event = cte::read()?;
        Ok(map_terminal_event(event, Instant::now()))
    }

    /// The options this session was created with.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();

        if self.focus_events_enabled {
            let _ = crossterm::execute!(stdout, cte::DisableFocusChange);
            self.focus_events_enabled = false;
        }

        if self.mouse_enabled {
            let _ = crossterm::execute!(stdout, cte::DisableMouseCapture);
            self.mouse_enabled = false;
            crate::info!("mouse capture disabled");
        }

        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            crate::info!("alternate screen disabled");
        }

        let _ = crossterm::terminal::disable_raw_mode();
        crate::info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, cte::DisableFocusChange);
    let _ = crossterm::execute!(stdout, cte::DisableMouseCapture);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                if signal == SIGINT || signal == SIGTERM {
                    crate::warn!("termination signal received, cleaning up");
                    best_effort_cleanup();
                    std::process::exit(128 + signal);
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn map_terminal_event(event: cte::Event, at: Instant) -> Option<TerminalEvent> {
    match event {
        cte::Event::Mouse(mouse) => PointerEvent::from_crossterm(mouse, at).map(TerminalEvent::Pointer),
        cte::Event::Key(key) if key.kind != cte::KeyEventKind::Release => {
            Some(TerminalEvent::Key(map_key(key)))
        }
        cte::Event::Resize(width, height) => Some(TerminalEvent::Resize { width, height }),
        cte::Event::FocusLost => Some(TerminalEvent::Pointer(PointerEvent::new(
            PointerKind::Cancel,
            Point::ZERO,
            at,
        ))),
        _ => None,
    }
}

fn map_key(key: cte::KeyEvent) -> KeyPress {
    let mapped = match key.code {
        cte::KeyCode::Char(c) => Key::Char(c),
        cte::KeyCode::Esc => Key::Escape,
        cte::KeyCode::Enter => Key::Enter,
        cte::KeyCode::Tab => Key::Tab,
        _ => Key::Other,
    };
    KeyPress {
        key: mapped,
        ctrl: key.modifiers.contains(cte::KeyModifiers::CONTROL),
    }
}
