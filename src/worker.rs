//! Worker runner: join, receive the assignment, then render in lockstep.
//!
//! A single sequential loop, blocking on the coordinator at every barrier.
//! The coordinator closing the connection at a barrier boundary ends the
//! session cleanly; anything else propagates as an error.

use std::io::ErrorKind;
use std::net::TcpStream;

use tracing::{info, trace};

use crate::error::{Error, Result};
use crate::model::{Domain, EquationFactory, Parameters, WallLayout, WorkerId};
use crate::protocol::{read_message, write_message, Message};
use crate::render::{render_tile, RenderSink};

pub struct WorkerConfig {
    pub id: WorkerId,
    pub layout: WallLayout,
    pub diffusion: f64,
}

/// Join the session at `addr` and run until the coordinator closes it.
/// The render sink is built once the tile dimensions are known and returned
/// for inspection.
pub fn run<S, F>(addr: &str, config: &WorkerConfig, make_sink: F) -> Result<S>
where
    S: RenderSink,
    F: FnOnce(usize, usize) -> S,
{
    let mut stream = TcpStream::connect(addr)?;
    info!(addr, col = config.id.col, row = config.id.row, "joining session");
    write_message(&mut stream, &Message::Join)?;

    let (equation_kind, width, height, initial) = loop {
        match read_message(&mut stream)? {
            Message::Assignment {
                equation,
                width,
                height,
                initial,
            } => break (equation, width, height, initial),
            other => trace!(message = ?other, "ignoring message while awaiting assignment"),
        }
    };
    if initial.dim() != (width, height) {
        return Err(Error::Protocol(format!(
            "assignment declares {}x{} but carries a {:?} field",
            width,
            height,
            initial.dim()
        )));
    }

    let domain = Domain::new(config.layout, config.id, width, height)?;
    let tile = domain.slice_initial(&initial)?;
    let params = Parameters::new(domain.nx, domain.ny, config.diffusion);
    params.validate()?;
    params.warn();
    let mut equation = EquationFactory::create(&equation_kind, params, tile)?;
    info!(
        equation = %equation_kind,
        nx = domain.nx,
        ny = domain.ny,
        start_x = domain.start_x,
        start_y = domain.start_y,
        "tile assigned"
    );

    let mut sink = make_sink(domain.nx, domain.ny);
    let mut frames = 0usize;
    loop {
        render_tile(&equation, domain.nx, domain.ny, &mut sink);
        frames += 1;
        if let Err(err) = write_message(&mut stream, &Message::Ready) {
            if session_closed(&err) {
                info!(frames, "session closed by coordinator");
                return Ok(sink);
            }
            return Err(err);
        }
        // Block until the barrier is released. Anything else is an echo to
        // be ignored, never a cue to re-send the ready signal.
        loop {
            match read_message(&mut stream) {
                Ok(Message::Advance) => break,
                Ok(other) => trace!(message = ?other, "ignoring message while awaiting advance"),
                Err(err) if session_closed(&err) => {
                    info!(frames, "session closed by coordinator");
                    return Ok(sink);
                }
                Err(err) => return Err(err),
            }
        }
        equation.advance(1.0);
    }
}

fn session_closed(error: &Error) -> bool {
    match error {
        Error::Io(err) => matches!(
            err.kind(),
            ErrorKind::UnexpectedEof
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted
                | ErrorKind::BrokenPipe
        ),
        _ => false,
    }
}
