use {
    crossterm::{
        event::{self, Event, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode},
    },
    log::debug,
    nvportinfo::{Error, Gateways, Result},
    std::{
        io::{self, IsTerminal, Write},
        process::ExitCode,
    },
};

#[cfg(windows)]
fn gateways() -> Result<Gateways> {
    use nvportinfo::{Session, WindowsDisplayConfig};

    let session = Session::open()?;
    Ok((Box::new(session), Box::new(WindowsDisplayConfig)))
}

#[cfg(not(windows))]
fn gateways() -> Result<Gateways> {
    Err(Error::Unsupported)
}

#[cfg(windows)]
fn utf8_console() {
    use windows::Win32::System::Console::SetConsoleOutputCP;

    const CP_UTF8: u32 = 65001;

    if !unsafe { SetConsoleOutputCP(CP_UTF8) }.as_bool() {
        debug!("SetConsoleOutputCP failed, box drawing may be garbled");
    }
}

#[cfg(not(windows))]
fn utf8_console() {}

fn wait_for_key() -> io::Result<()> {
    enable_raw_mode()?;
    let res = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
            Ok(_) => (),
            Err(e) => break Err(e),
        }
    };
    disable_raw_mode()?;
    res
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    utf8_console();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let ok = writeln!(out, "nvportinfo {}\n", env!("CARGO_PKG_VERSION"))
        .and_then(|()| nvportinfo::run(&mut out, gateways()))
        .and_then(|ok| {
            writeln!(out, "Press 'any' key.")?;
            out.flush()?;
            Ok(ok)
        });
    drop(out);

    let ok = match ok {
        Ok(ok) => ok,
        Err(e) => {
            log::error!("{}", Error::from(e));
            false
        },
    };

    if io::stdin().is_terminal() {
        if let Err(e) = wait_for_key() {
            debug!("keypress wait: {e}");
        }
    }

    match ok {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    }
}
