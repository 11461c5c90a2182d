//! Laptop record store and search filter
use super::error::{Result, StoreError};
use crate::context::CallContext;
use crate::pb::{Filter, Laptop, Memory, MemoryUnit};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

pub trait LaptopStore: Send + Sync {
    /// Store a laptop and return its ID
    ///
    /// An empty ID is replaced by a fresh UUID v4; a non-empty one must be a
    /// valid UUID. Saving an ID that is already present fails and leaves the
    /// existing record untouched.
    fn save(&self, laptop: Laptop) -> Result<String>;

    /// Copy of the laptop with the given ID, if any
    fn find(&self, id: &str) -> Result<Option<Laptop>>;

    /// Feed every laptop that passes `filter` to `found`
    ///
    /// `ctx` is checked before each match. Cancellation or a `found` error
    /// stops the search and is returned as is.
    fn search(
        &self,
        ctx: &CallContext,
        filter: &Filter,
        found: &mut dyn FnMut(Laptop) -> Result<()>,
    ) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryLaptopStore {
    data: RwLock<HashMap<String, Laptop>>,
}

impl InMemoryLaptopStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl LaptopStore for InMemoryLaptopStore {
    fn save(&self, mut laptop: Laptop) -> Result<String> {
        if laptop.id.is_empty() {
            laptop.id = Uuid::new_v4().to_string();
        } else if Uuid::parse_str(&laptop.id).is_err() {
            return Err(StoreError::InvalidId(laptop.id));
        }

        let mut data = self.data.write();
        if data.contains_key(&laptop.id) {
            return Err(StoreError::AlreadyExists(laptop.id));
        }

        let id = laptop.id.clone();
        data.insert(id.clone(), laptop);
        Ok(id)
    }

    fn find(&self, id: &str) -> Result<Option<Laptop>> {
        Ok(self.data.read().get(id).cloned())
    }

    fn search(
        &self,
        ctx: &CallContext,
        filter: &Filter,
        found: &mut dyn FnMut(Laptop) -> Result<()>,
    ) -> Result<()> {
        // Copy matches out so `found` never runs under the lock
        let matches: Vec<Laptop> = self
            .data
            .read()
            .values()
            .filter(|laptop| is_qualified(filter, laptop))
            .cloned()
            .collect();

        for laptop in matches {
            ctx.check()?;
            debug!(id = %laptop.id, "laptop matches filter");
            found(laptop)?;
        }

        Ok(())
    }
}

/// Whether `laptop` satisfies every bound in `filter`
///
/// Missing sub-records count as zero, so a laptop without a CPU fails any
/// positive core or clock bound.
pub fn is_qualified(filter: &Filter, laptop: &Laptop) -> bool {
    if laptop.price_usd > filter.max_price_usd {
        return false;
    }

    let (cores, min_ghz) = laptop
        .cpu
        .as_ref()
        .map_or((0, 0.0), |cpu| (cpu.number_cores, cpu.min_ghz));

    if cores < filter.min_cpu_cores || min_ghz < filter.min_cpu_ghz {
        return false;
    }

    let ram = laptop.ram.as_ref().map_or(0, to_bits);
    let min_ram = filter.min_ram.as_ref().map_or(0, to_bits);

    ram >= min_ram
}

/// Memory size in bits, binary multiples; unknown units count as zero
pub fn to_bits(memory: &Memory) -> u64 {
    let value = memory.value;

    match MemoryUnit::try_from(memory.unit).unwrap_or(MemoryUnit::Unknown) {
        MemoryUnit::Bit => value,
        MemoryUnit::Byte => value.saturating_mul(1 << 3),
        MemoryUnit::Kilobyte => value.saturating_mul(1 << 13),
        MemoryUnit::Megabyte => value.saturating_mul(1 << 23),
        MemoryUnit::Gigabyte => value.saturating_mul(1 << 33),
        MemoryUnit::Terabyte => value.saturating_mul(1 << 43),
        MemoryUnit::Unknown => 0,
    }
}
