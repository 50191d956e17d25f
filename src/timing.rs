//! Wall-clock and CPU-time measurement around a kernel.

use std::{io, mem};

use libc::{clockid_t, timespec, CLOCK_PROCESS_CPUTIME_ID, CLOCK_REALTIME};

use crate::error::{Error, Result};

const NANOS_PER_SEC: i64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    Realtime,
    ProcessCpu,
}

impl Clock {
    fn id(self) -> clockid_t {
        match self {
            Clock::Realtime => CLOCK_REALTIME,
            Clock::ProcessCpu => CLOCK_PROCESS_CPUTIME_ID,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Clock::Realtime => "real-time",
            Clock::ProcessCpu => "process CPU",
        }
    }
}

/// Seconds plus nanoseconds, as read from `clock_gettime`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timespec {
    pub sec: i64,
    pub nsec: i64,
}

impl Timespec {
    pub fn new(sec: i64, nsec: i64) -> Self {
        Self { sec, nsec }
    }

    pub fn now(clock: Clock) -> Result<Self> {
        // SAFETY: All-zero is a valid initial value for this type.
        let mut ts: timespec = unsafe { mem::zeroed() };

        // SAFETY: `ts` is a valid, writable timespec and the clock id is a libc constant.
        let result = unsafe { libc::clock_gettime(clock.id(), &mut ts) };
        if result != 0 {
            return Err(Error::Clock {
                clock: clock.name(),
                source: io::Error::last_os_error(),
            });
        }

        Ok(Self {
            sec: ts.tv_sec as i64,
            nsec: ts.tv_nsec as i64,
        })
    }

    /// `self - earlier`, borrowing a second when the nanoseconds go negative.
    pub fn diff(&self, earlier: &Timespec) -> Timespec {
        let mut sec = self.sec - earlier.sec;
        let mut nsec = self.nsec - earlier.nsec;
        if nsec < 0 {
            sec -= 1;
            nsec += NANOS_PER_SEC;
        }
        Timespec { sec, nsec }
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.nsec as f64 / 1e9
    }
}

/// Elapsed real and CPU time of one measured section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Elapsed {
    pub real: Timespec,
    pub cpu: Timespec,
}

#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    begin_real: Timespec,
    begin_cpu: Timespec,
}

impl Stopwatch {
    pub fn start() -> Result<Self> {
        Ok(Self {
            begin_real: Timespec::now(Clock::Realtime)?,
            begin_cpu: Timespec::now(Clock::ProcessCpu)?,
        })
    }

    pub fn stop(&self) -> Result<Elapsed> {
        let end_real = Timespec::now(Clock::Realtime)?;
        let end_cpu = Timespec::now(Clock::ProcessCpu)?;

        Ok(Elapsed {
            real: end_real.diff(&self.begin_real),
            cpu: end_cpu.diff(&self.begin_cpu),
        })
    }
}

/// Runs `f` between a stopwatch start and stop.
pub fn measure<T>(f: impl FnOnce() -> T) -> Result<(T, Elapsed)> {
    let stopwatch = Stopwatch::start()?;
    let value = f();
    let elapsed = stopwatch.stop()?;
    Ok((value, elapsed))
}
