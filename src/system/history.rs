use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 60;

/// Bounded ring of recent samples, owned by one tracked process.
///
/// It lives and dies with its entity, so a reused PID never inherits the
/// samples of the process that held the PID before.
#[derive(Debug, Clone)]
pub struct ProcessHistory {
    memory: VecDeque<u64>,
    cpu: VecDeque<f64>,
    capacity: usize,
}

impl ProcessHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            memory: VecDeque::with_capacity(capacity),
            cpu: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, memory: u64, cpu: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.memory.len() == self.capacity {
            self.memory.pop_front();
        }
        if self.cpu.len() == self.capacity {
            self.cpu.pop_front();
        }
        self.memory.push_back(memory);
        self.cpu.push_back(cpu);
    }

    pub fn memory(&self) -> &VecDeque<u64> {
        &self.memory
    }

    pub fn cpu(&self) -> &VecDeque<f64> {
        &self.cpu
    }

    pub fn len(&self) -> usize {
        self.cpu.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty()
    }

    /// CPU samples scaled to hundredths of a percent, for sparklines.
    pub fn cpu_sparkline(&self) -> Vec<u64> {
        self.cpu.iter().map(|v| (v * 100.0).round() as u64).collect()
    }
}

impl Default for ProcessHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
