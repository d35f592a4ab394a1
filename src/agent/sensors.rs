use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sysinfo::{Pid, System};

/// Exclusive upper bound of synthetic temperatures.
pub const MAX_TEMPERATURE: u32 = 500;

/// Synthetic thermostat: uniformly random whole degrees in `[0, 500)`.
#[derive(Debug)]
pub struct TemperatureSource {
    rng: StdRng,
}

impl TemperatureSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn read(&mut self) -> f64 {
        f64::from(self.rng.gen_range(0..MAX_TEMPERATURE))
    }
}

/// Memory footprint of the current process.
pub struct ProcessMemory {
    system: System,
    pid: Option<Pid>,
}

impl ProcessMemory {
    pub fn current() -> Self {
        Self {
            system: System::new(),
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    /// Resident memory in kilobytes. 0 when the process cannot be inspected.
    pub fn working_set_kb(&mut self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };
        self.system.refresh_process(pid);
        self.system
            .process(pid)
            .map(|process| process.memory() / 1024)
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for ProcessMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessMemory").field("pid", &self.pid).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperatures_are_whole_and_in_range() {
        let mut source = TemperatureSource::seeded(7);
        for _ in 0..10_000 {
            let t = source.read();
            assert!((0.0..500.0).contains(&t), "out of range: {}", t);
            assert_eq!(t.fract(), 0.0, "not whole: {}", t);
        }
    }

    #[test]
    fn seeded_sources_repeat() {
        let mut a = TemperatureSource::seeded(42);
        let mut b = TemperatureSource::seeded(42);
        let xs: Vec<f64> = (0..16).map(|_| a.read()).collect();
        let ys: Vec<f64> = (0..16).map(|_| b.read()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn own_process_has_memory() {
        let mut probe = ProcessMemory::current();
        assert!(probe.working_set_kb() > 0);
    }
}
