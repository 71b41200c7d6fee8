/// Tick scheduler: a repeating alarm with a mutable period.
///
/// The period is the time between two forward moves of the car, so a
/// shorter period means a faster car. A zero period means disarmed.
///
/// The alarm itself only raises `PendingFlags::tick`. Moving the car and
/// checking the result happen in the game loop.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::SpeedConfig;
use crate::error::GameError;
use crate::ui::signals::PendingFlags;

/// Something that can fire repeatedly every `period`. `None` disarms.
pub trait Alarm {
    fn program(&mut self, period: Option<Duration>) -> Result<(), GameError>;
}

pub struct TickScheduler {
    period: Duration,
    speed: SpeedConfig,
    alarm: Box<dyn Alarm>,
}

impl TickScheduler {
    /// Starts disarmed; the first `accelerate` arms it.
    pub fn new(speed: SpeedConfig, alarm: Box<dyn Alarm>) -> Self {
        TickScheduler { period: Duration::ZERO, speed, alarm }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        !self.period.is_zero()
    }

    /// Shorten the period by one step, or arm at the start period.
    /// Returns whether anything changed.
    pub fn accelerate(&mut self) -> Result<bool, GameError> {
        let next = if self.is_armed() {
            faster(self.period, self.speed.step)
        } else {
            Some(self.speed.start_period)
        };
        self.reprogram(next)
    }

    /// Lengthen the period by one step. No-op while disarmed.
    pub fn decelerate(&mut self) -> Result<bool, GameError> {
        if !self.is_armed() {
            return Ok(false);
        }
        self.reprogram(slower(self.period, self.speed.step, self.speed.max_period))
    }

    /// Disarm. The next `accelerate` starts over at the start period.
    pub fn stop(&mut self) -> Result<(), GameError> {
        self.period = Duration::ZERO;
        self.alarm.program(None)
    }

    fn reprogram(&mut self, next: Option<Duration>) -> Result<bool, GameError> {
        let Some(period) = next else {
            return Ok(false);
        };
        self.alarm.program(Some(period))?;
        self.period = period;
        Ok(true)
    }
}

/// One step shorter, unless that would reach zero.
pub fn faster(period: Duration, step: Duration) -> Option<Duration> {
    period.checked_sub(step).filter(|p| !p.is_zero())
}

/// One step longer, unless that would pass `max`.
pub fn slower(period: Duration, step: Duration, max: Duration) -> Option<Duration> {
    period.checked_add(step).filter(|p| *p <= max)
}

// ══════════════════════════════════════════════════════════════
// Thread-backed alarm
// ══════════════════════════════════════════════════════════════

/// Alarm running on its own thread. Reprogramming restarts the countdown
/// from the moment of the call.
pub struct ThreadAlarm {
    tx: Option<Sender<Option<Duration>>>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadAlarm {
    pub fn spawn(flags: PendingFlags) -> Result<Self, GameError> {
        let (tx, rx) = mpsc::channel::<Option<Duration>>();
        let handle = thread::Builder::new()
            .name("tick-alarm".into())
            .spawn(move || {
                let mut period: Option<Duration> = None;
                let mut deadline: Option<Instant> = None;
                loop {
                    let msg = match deadline {
                        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
                        Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
                    };
                    match msg {
                        Ok(p) => {
                            period = p;
                            deadline = p.map(|p| Instant::now() + p);
                        }
                        Err(RecvTimeoutError::Timeout) => {
                            flags.raise_tick();
                            if let (Some(p), Some(d)) = (period, deadline) {
                                let now = Instant::now();
                                let next = d + p;
                                deadline = Some(if next > now { next } else { now + p });
                            }
                        }
                        Err(RecvTimeoutError::Disconnected) => return,
                    }
                }
            })
            .map_err(|e| GameError::resource("creating tick timer", e))?;

        Ok(ThreadAlarm { tx: Some(tx), handle: Some(handle) })
    }
}

impl Alarm for ThreadAlarm {
    fn program(&mut self, period: Option<Duration>) -> Result<(), GameError> {
        let gone = || {
            GameError::resource(
                "programming tick timer",
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "timer thread exited"),
            )
        };
        let tx = self.tx.as_ref().ok_or_else(gone)?;
        tx.send(period).map_err(|_| gone())
    }
}

impl Drop for ThreadAlarm {
    fn drop(&mut self) {
        // closing the channel ends the thread
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every program call.
    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Option<Duration>>>>);

    impl Alarm for Recorder {
        fn program(&mut self, period: Option<Duration>) -> Result<(), GameError> {
            self.0.borrow_mut().push(period);
            Ok(())
        }
    }

    const MS: Duration = Duration::from_millis(1);

    fn speed() -> SpeedConfig {
        SpeedConfig {
            start_period: 250 * MS,
            step: 10 * MS,
            max_period: 300 * MS,
        }
    }

    fn scheduler() -> (TickScheduler, Recorder) {
        let rec = Recorder::default();
        (TickScheduler::new(speed(), Box::new(rec.clone())), rec)
    }

    #[test]
    fn first_accelerate_arms_at_start_period() {
        let (mut s, rec) = scheduler();
        assert!(!s.is_armed());
        assert!(s.accelerate().unwrap());
        assert_eq!(s.period(), 250 * MS);
        assert_eq!(*rec.0.borrow(), vec![Some(250 * MS)]);
    }

    #[test]
    fn accelerate_then_decelerate_restores_period() {
        let (mut s, _) = scheduler();
        s.accelerate().unwrap();
        s.accelerate().unwrap();
        let before = s.period();
        assert!(s.accelerate().unwrap());
        assert!(s.decelerate().unwrap());
        assert_eq!(s.period(), before);
    }

    #[test]
    fn floor_keeps_period_positive() {
        let (mut s, rec) = scheduler();
        s.accelerate().unwrap();
        for _ in 0..100 {
            s.accelerate().unwrap();
        }
        assert_eq!(s.period(), 10 * MS);
        let calls = rec.0.borrow().len();
        assert!(!s.accelerate().unwrap());
        assert_eq!(rec.0.borrow().len(), calls);
    }

    #[test]
    fn ceiling_blocks_decelerate() {
        let (mut s, _) = scheduler();
        s.accelerate().unwrap();
        for _ in 0..5 {
            assert!(s.decelerate().unwrap());
        }
        assert_eq!(s.period(), 300 * MS);
        assert!(!s.decelerate().unwrap());
        assert_eq!(s.period(), 300 * MS);
    }

    #[test]
    fn decelerate_while_disarmed_is_noop() {
        let (mut s, rec) = scheduler();
        assert!(!s.decelerate().unwrap());
        assert!(rec.0.borrow().is_empty());
    }

    #[test]
    fn stop_disarms_and_restarts_at_start_period() {
        let (mut s, rec) = scheduler();
        s.accelerate().unwrap();
        s.accelerate().unwrap();
        s.stop().unwrap();
        assert!(!s.is_armed());
        assert_eq!(rec.0.borrow().last(), Some(&None));
        s.accelerate().unwrap();
        assert_eq!(s.period(), 250 * MS);
    }

    #[test]
    fn step_borrows_across_whole_seconds() {
        let step = 10 * MS;
        assert_eq!(faster(Duration::from_millis(1005), step), Some(Duration::from_millis(995)));
        assert_eq!(slower(Duration::from_millis(995), step, Duration::from_secs(5)), Some(Duration::from_millis(1005)));
        assert_eq!(faster(Duration::from_millis(5), step), None);
    }

    #[test]
    fn thread_alarm_fires_and_stops() {
        let flags = PendingFlags::new();
        let mut alarm = ThreadAlarm::spawn(flags.clone()).unwrap();

        alarm.program(Some(5 * MS)).unwrap();
        let start = Instant::now();
        while !flags.take_tick() {
            assert!(start.elapsed() < Duration::from_secs(2), "alarm never fired");
            thread::sleep(MS);
        }

        alarm.program(None).unwrap();
        thread::sleep(20 * MS);
        flags.take_tick();
        thread::sleep(50 * MS);
        assert!(!flags.take_tick());
    }

    #[test]
    fn disarmed_alarm_stays_quiet() {
        let flags = PendingFlags::new();
        let _alarm = ThreadAlarm::spawn(flags.clone()).unwrap();
        thread::sleep(30 * MS);
        assert!(!flags.any());
    }
}
