//! Coordinator runner: rendezvous, one-shot broadcast, repeating barrier.
//!
//! Transport plumbing only. An acceptor thread hands every connection to a
//! per-peer reader thread; readers fan their decoded messages into one
//! channel, and the single session loop below owns all protocol state. Every
//! wait is unbounded: a worker that never answers stalls the whole wall, by
//! design.

use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use ndarray::Array2;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::protocol::{read_message, write_message, Message};
use crate::session::{Action, PeerId, Session};

/// Everything the coordinator needs to run one wall session.
pub struct CoordinatorConfig {
    /// Join quorum; the wall layout's worker count.
    pub expected: usize,
    /// Equation kind discriminator broadcast to the workers.
    pub equation: String,
    pub width: usize,
    pub height: usize,
    pub initial: Array2<f64>,
    /// Barrier rounds to run before closing the session; 0 runs forever.
    pub steps: usize,
}

enum Event {
    Connected(PeerId, TcpStream),
    Message(PeerId, Message),
    Disconnected(PeerId),
}

pub struct Coordinator {
    listener: TcpListener,
    config: CoordinatorConfig,
}

impl Coordinator {
    pub fn bind(addr: &str, config: CoordinatorConfig) -> Result<Self> {
        if config.expected == 0 {
            return Err(Error::invalid_parameters(
                "A session needs at least one worker",
            ));
        }
        let listener = TcpListener::bind(addr)?;
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Run the session to completion. With `steps == 0` this never returns;
    /// otherwise it returns after the final barrier release, closing every
    /// worker connection.
    pub fn run(self) -> Result<()> {
        let (tx, rx) = unbounded();
        let listener = self.listener;
        thread::spawn(move || accept_loop(listener, tx));
        session_loop(&rx, &self.config)
    }
}

fn accept_loop(listener: TcpListener, tx: Sender<Event>) {
    for (peer, stream) in listener.incoming().flatten().enumerate() {
        let reader = match stream.try_clone() {
            Ok(reader) => reader,
            Err(err) => {
                warn!(peer, error = %err, "could not clone connection, dropping it");
                continue;
            }
        };
        if tx.send(Event::Connected(peer, stream)).is_err() {
            return; // session over
        }
        let tx = tx.clone();
        thread::spawn(move || read_loop(peer, reader, &tx));
    }
}

fn read_loop(peer: PeerId, mut stream: TcpStream, tx: &Sender<Event>) {
    loop {
        match read_message(&mut stream) {
            Ok(message) => {
                if tx.send(Event::Message(peer, message)).is_err() {
                    return;
                }
            }
            Err(_) => {
                let _ = tx.send(Event::Disconnected(peer));
                return;
            }
        }
    }
}

fn session_loop(rx: &Receiver<Event>, config: &CoordinatorConfig) -> Result<()> {
    let mut session = Session::new(config.expected);
    // Indexed by PeerId; None once rejected or disconnected.
    let mut peers: Vec<Option<TcpStream>> = Vec::new();
    info!(expected = config.expected, "waiting for workers to join");
    loop {
        let event = rx
            .recv()
            .map_err(|_| Error::protocol("acceptor thread terminated"))?;
        match event {
            Event::Connected(peer, stream) => {
                debug!(peer, "worker connected");
                debug_assert_eq!(peer, peers.len());
                peers.push(Some(stream));
            }
            Event::Disconnected(peer) => {
                if let Some(slot) = peers.get_mut(peer) {
                    *slot = None;
                }
                if session.is_joined(peer) {
                    warn!(peer, "worker connection lost, the session can no longer advance");
                }
            }
            Event::Message(peer, message) => {
                handle_message(&mut session, &mut peers, peer, message, config)?;
            }
        }
        if config.steps != 0 && session.rounds() == config.steps {
            info!(rounds = session.rounds(), "configured step count reached, closing session");
            return Ok(());
        }
    }
}

fn handle_message(
    session: &mut Session,
    peers: &mut [Option<TcpStream>],
    peer: PeerId,
    message: Message,
    config: &CoordinatorConfig,
) -> Result<()> {
    match message {
        Message::Join => match session.handle_join(peer) {
            Ok(Action::Broadcast) => {
                let assignment = Message::Assignment {
                    equation: config.equation.clone(),
                    width: config.width,
                    height: config.height,
                    initial: config.initial.clone(),
                };
                broadcast(session, peers, &assignment)?;
            }
            Ok(_) => {}
            Err(err @ Error::LateJoin { .. }) => {
                warn!(peer, error = %err, "rejecting join");
                if let Some(stream) = peers.get_mut(peer).and_then(Option::take) {
                    let _ = stream.shutdown(Shutdown::Both);
                }
            }
            Err(err) => warn!(peer, error = %err, "ignoring join"),
        },
        Message::Ready => match session.handle_ready(peer) {
            Ok(Action::ReleaseBarrier) => broadcast(session, peers, &Message::Advance)?,
            Ok(_) => {}
            Err(err) => warn!(peer, error = %err, "rejecting barrier message"),
        },
        other => warn!(peer, message = ?other, "unexpected message from worker"),
    }
    Ok(())
}

fn broadcast(
    session: &Session,
    peers: &mut [Option<TcpStream>],
    message: &Message,
) -> Result<()> {
    for peer in session.peers() {
        if let Some(stream) = peers.get_mut(peer).and_then(Option::as_mut) {
            write_message(stream, message)?;
        }
    }
    Ok(())
}
