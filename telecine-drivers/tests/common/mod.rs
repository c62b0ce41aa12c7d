//! Recording mocks for the HAL traits and a scripted decoder

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use telecine_core::codec::{FrameBuffer, PixelOrder};
use telecine_core::traits::{FrameScaler, SourceKind, StreamInfo, VideoDecoder, VideoSession};
use telecine_core::SourceError;
use telecine_drivers::St7789;
use telecine_hal::{Clock, Level, OutputPin, SpiBus};

/// Everything the driver did to the hardware, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Dc(Level),
    Rst(Level),
    Write(Vec<u8>),
    Delay(Duration),
}

pub type Log = Rc<RefCell<Vec<Op>>>;

/// Shared switches for injecting failures
#[derive(Default)]
pub struct Faults {
    /// Fail every bus write
    pub bus_dead: Cell<bool>,
    /// Fail the next multi-byte (pixel) write, once
    pub fail_next_pixel_write: Cell<bool>,
    /// Fail every RST transition
    pub rst_dead: Cell<bool>,
}

pub struct MockSpi {
    log: Log,
    faults: Rc<Faults>,
    limit: usize,
}

impl SpiBus for MockSpi {
    type Error = &'static str;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if self.faults.bus_dead.get() {
            return Err("bus dead");
        }
        if data.len() > 1 && self.faults.fail_next_pixel_write.replace(false) {
            return Err("transfer aborted");
        }
        assert!(data.len() <= self.limit, "write of {} exceeds bus limit", data.len());
        self.log.borrow_mut().push(Op::Write(data.to_vec()));
        Ok(())
    }

    fn max_transfer_len(&self) -> usize {
        self.limit
    }
}

pub struct MockPin {
    log: Log,
    faults: Rc<Faults>,
    kind: fn(Level) -> Op,
}

impl OutputPin for MockPin {
    type Error = &'static str;

    fn set_level(&mut self, level: Level) -> Result<(), Self::Error> {
        let op = (self.kind)(level);
        if matches!(op, Op::Rst(_)) && self.faults.rst_dead.get() {
            return Err("line stuck");
        }
        self.log.borrow_mut().push(op);
        Ok(())
    }
}

pub struct MockClock {
    log: Log,
    now: Rc<Cell<Duration>>,
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.now.set(self.now.get() + duration);
        self.log.borrow_mut().push(Op::Delay(duration));
    }
}

pub type Lcd = St7789<MockSpi, MockPin, MockPin, MockClock>;

/// Handles kept by the test while the driver owns the mocks
pub struct Rig {
    pub log: Log,
    pub faults: Rc<Faults>,
    pub now: Rc<Cell<Duration>>,
}

impl Rig {
    pub fn take(&self) -> Vec<Op> {
        self.log.borrow_mut().drain(..).collect()
    }
}

/// Driver over recording mocks
pub fn rig(max_chunk_bytes: usize, bus_limit: usize) -> (Lcd, Rig) {
    let log: Log = Rc::default();
    let faults: Rc<Faults> = Rc::default();
    let now = Rc::new(Cell::new(Duration::ZERO));

    let lcd = St7789::new(
        MockSpi {
            log: log.clone(),
            faults: faults.clone(),
            limit: bus_limit,
        },
        MockPin {
            log: log.clone(),
            faults: faults.clone(),
            kind: Op::Dc,
        },
        MockPin {
            log: log.clone(),
            faults: faults.clone(),
            kind: Op::Rst,
        },
        MockClock {
            log: log.clone(),
            now: now.clone(),
        },
        max_chunk_bytes,
    );

    (lcd, Rig { log, faults, now })
}

/// A second clock on the same timeline, for the playback loop
pub fn clock(rig: &Rig) -> MockClock {
    MockClock {
        log: rig.log.clone(),
        now: rig.now.clone(),
    }
}

/// One decoded command: its byte, the parameter bytes that followed and
/// the delays issued before the next command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub command: u8,
    pub data: Vec<u8>,
    pub delay: Duration,
}

/// Group a log into commands by tracking the D/C level
pub fn commands(ops: &[Op]) -> Vec<Sent> {
    let mut sent: Vec<Sent> = Vec::new();
    let mut dc = None;

    for op in ops {
        match op {
            Op::Dc(level) => dc = Some(*level),
            Op::Write(bytes) => match dc {
                Some(Level::Low) => {
                    assert_eq!(bytes.len(), 1, "commands are single bytes");
                    sent.push(Sent {
                        command: bytes[0],
                        data: Vec::new(),
                        delay: Duration::ZERO,
                    });
                }
                Some(Level::High) => {
                    if let Some(last) = sent.last_mut() {
                        last.data.extend_from_slice(bytes);
                    }
                }
                None => panic!("write before D/C was driven"),
            },
            Op::Delay(d) => {
                if let Some(last) = sent.last_mut() {
                    last.delay += *d;
                }
            }
            Op::Rst(_) => {}
        }
    }

    sent
}

/// Multi-byte writes (pixel chunks)
pub fn pixel_writes(ops: &[Op]) -> Vec<&Vec<u8>> {
    ops.iter()
        .filter_map(|op| match op {
            Op::Write(bytes) if bytes.len() > 1 => Some(bytes),
            _ => None,
        })
        .collect()
}

/// Finite or live decoder yielding solid frames
pub struct ScriptedDecoder {
    pub frames_per_pass: usize,
    pub kind: SourceKind,
    pub opens: Rc<Cell<u32>>,
    pub seeks: Rc<Cell<u32>>,
    pub fail_opens: u32,
}

impl ScriptedDecoder {
    pub fn finite(frames_per_pass: usize) -> Self {
        Self {
            frames_per_pass,
            kind: SourceKind::Finite,
            opens: Rc::default(),
            seeks: Rc::default(),
            fail_opens: 0,
        }
    }
}

pub struct ScriptedSession {
    per_pass: usize,
    remaining: usize,
    kind: SourceKind,
    seeks: Rc<Cell<u32>>,
}

impl VideoDecoder for ScriptedDecoder {
    type Session = ScriptedSession;

    fn open(&mut self) -> Result<ScriptedSession, SourceError> {
        self.opens.set(self.opens.get() + 1);
        if self.opens.get() <= self.fail_opens {
            return Err(SourceError::Unavailable);
        }
        Ok(ScriptedSession {
            per_pass: self.frames_per_pass,
            remaining: self.frames_per_pass,
            kind: self.kind,
            seeks: self.seeks.clone(),
        })
    }
}

impl VideoSession for ScriptedSession {
    fn info(&self) -> StreamInfo {
        StreamInfo {
            width: 8,
            height: 6,
            frame_rate: Some(30.0),
            kind: self.kind,
        }
    }

    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, SourceError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        // Pure red in BGR order
        let data = [0u8, 0, 255].repeat(8 * 6);
        FrameBuffer::new(8, 6, PixelOrder::Bgr, data).map(Some)
    }

    fn seek_to_start(&mut self) -> Result<(), SourceError> {
        self.seeks.set(self.seeks.get() + 1);
        self.remaining = self.per_pass;
        Ok(())
    }
}

/// Stretches solid-color frames by repeating their first pixel
pub struct SolidScaler;

impl FrameScaler for SolidScaler {
    fn resize(&mut self, frame: FrameBuffer, width: u32, height: u32) -> FrameBuffer {
        let data = frame.data()[..3].repeat((width * height) as usize);
        FrameBuffer::new(width, height, frame.order(), data).unwrap()
    }
}
