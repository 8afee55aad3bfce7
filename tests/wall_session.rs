//! Full sessions over loopback TCP: a coordinator thread plus one worker
//! thread per tile, checked for partitioning and lockstep.

use std::thread;

use ndarray::Array2;

use heatwall::coordinator::{Coordinator, CoordinatorConfig};
use heatwall::model::{WallLayout, WorkerId};
use heatwall::render::RenderSink;
use heatwall::worker::{self, WorkerConfig};

/// Records every committed frame, column-major like the tile itself.
struct RecordingSink {
    rows: usize,
    current: Vec<f64>,
    frames: Vec<Vec<f64>>,
}

impl RecordingSink {
    fn new(cols: usize, rows: usize) -> Self {
        Self {
            rows,
            current: vec![0.0; cols * rows],
            frames: Vec::new(),
        }
    }

    fn cell(&self, frame: usize, col: usize, row: usize) -> f64 {
        self.frames[frame][col * self.rows + row]
    }
}

impl RenderSink for RecordingSink {
    fn render_cell(&mut self, col: usize, row: usize, value: f64) {
        self.current[col * self.rows + row] = value;
    }

    fn flip(&mut self) {
        self.frames.push(self.current.clone());
    }
}

fn spawn_coordinator(
    config: CoordinatorConfig,
) -> (thread::JoinHandle<heatwall::error::Result<()>>, String) {
    let coordinator = Coordinator::bind("127.0.0.1:0", config).expect("bind coordinator");
    let addr = coordinator.local_addr().expect("local addr").to_string();
    (thread::spawn(move || coordinator.run()), addr)
}

fn spawn_worker(
    addr: &str,
    layout: WallLayout,
    id: WorkerId,
) -> thread::JoinHandle<heatwall::error::Result<RecordingSink>> {
    let addr = addr.to_string();
    thread::spawn(move || {
        let config = WorkerConfig {
            id,
            layout,
            diffusion: 0.5,
        };
        worker::run(&addr, &config, RecordingSink::new)
    })
}

#[test]
fn heat_session_partitions_the_initial_condition() {
    let mut initial = Array2::zeros((10, 10));
    initial[[5, 5]] = 200.0;
    let steps = 3;
    let (coordinator, addr) = spawn_coordinator(CoordinatorConfig {
        expected: 2,
        equation: "heat".to_string(),
        width: 10,
        height: 10,
        initial,
        steps,
    });

    let layout = WallLayout::new(2, 1);
    let left = spawn_worker(&addr, layout, WorkerId::new(0, 0));
    let right = spawn_worker(&addr, layout, WorkerId::new(1, 0));

    let left = left.join().unwrap().expect("left worker");
    let right = right.join().unwrap().expect("right worker");
    coordinator.join().unwrap().expect("coordinator");

    // One frame before each barrier round, plus the final render whose ready
    // signal finds the session closed.
    assert_eq!(left.frames.len(), steps + 1);
    assert_eq!(right.frames.len(), steps + 1);

    // Scenario: the right tile holds columns [5, 10), so global (5, 5) lands
    // at its local (0, 5); the left tile starts all cold.
    assert_eq!(right.cell(0, 0, 5), 200.0);
    assert_eq!(
        right.frames[0].iter().filter(|&&v| v != 0.0).count(),
        1,
        "only the hot cell is set in the first frame"
    );
    assert!(left.frames[0].iter().all(|&v| v == 0.0));

    // The hot cell sits on the right tile's own border, so it stays fixed
    // while leaking heat into the interior neighbor at local (1, 5).
    assert_eq!(right.cell(steps, 0, 5), 200.0);
    assert_eq!(right.cell(0, 1, 5), 0.0);
    assert!(right.cell(1, 1, 5) > 0.0);

    // A cold tile stays cold: nothing crosses tile boundaries.
    assert!(left.frames[steps].iter().all(|&v| v == 0.0));
}

#[test]
fn checkerboard_wall_stays_in_lockstep() {
    let steps = 2;
    let (coordinator, addr) = spawn_coordinator(CoordinatorConfig {
        expected: 3,
        equation: "checkerboard".to_string(),
        width: 9,
        height: 4,
        initial: Array2::zeros((9, 4)),
        steps,
    });

    let layout = WallLayout::new(3, 1);
    let handles: Vec<_> = (0..3)
        .map(|col| spawn_worker(&addr, layout, WorkerId::new(col, 0)))
        .collect();
    let sinks: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().expect("worker"))
        .collect();
    coordinator.join().unwrap().expect("coordinator");

    // Every worker committed the same number of frames, and frame i shows
    // the same global time on every tile: no tile runs ahead or behind.
    for sink in &sinks {
        assert_eq!(sink.frames.len(), steps + 1);
        assert_eq!(sink.cell(0, 0, 0), 255.0);
        assert_eq!(sink.cell(0, 1, 0), 0.0);
        assert_eq!(sink.cell(1, 0, 0), 251.0);
        assert_eq!(sink.cell(1, 1, 0), 4.0);
        assert_eq!(sink.cell(2, 0, 0), 247.0);
    }
    for frame in 0..=steps {
        assert_eq!(sinks[0].frames[frame], sinks[1].frames[frame]);
        assert_eq!(sinks[1].frames[frame], sinks[2].frames[frame]);
    }
}

#[test]
fn unrecognized_equation_falls_back_to_the_null_constant() {
    let (coordinator, addr) = spawn_coordinator(CoordinatorConfig {
        expected: 1,
        equation: "plasma".to_string(),
        width: 6,
        height: 6,
        initial: Array2::zeros((6, 6)),
        steps: 1,
    });

    let layout = WallLayout::new(1, 1);
    let sink = spawn_worker(&addr, layout, WorkerId::new(0, 0))
        .join()
        .unwrap()
        .expect("worker");
    coordinator.join().unwrap().expect("coordinator");

    assert_eq!(sink.frames.len(), 2);
    for frame in &sink.frames {
        assert!(frame.iter().all(|&v| v == 100.0));
    }
}
