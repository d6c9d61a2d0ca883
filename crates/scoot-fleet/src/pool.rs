//! The Parking Resource Pool.
//!
//! The pool is the sole owner of every lot's stock.  All mutation goes
//! through `&mut ParkingPool`, so a take and a put on the same lot can never
//! interleave; the borrow checker is the lock.

use scoot_core::{NodeId, ParkingId, VehicleId};

use crate::parking::ParkingLot;
use crate::{FleetError, FleetResult, IdMap};

#[derive(Default)]
pub struct ParkingPool {
    /// Lots in insertion (plan) order.
    lots:   Vec<ParkingLot>,
    /// `ParkingId → index into lots`.
    slot:   IdMap<ParkingId, usize>,
    /// Reverse index: which lot each docked vehicle stands in.
    docked: IdMap<VehicleId, ParkingId>,
}

impl ParkingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lot.  Any vehicles already in its stock are indexed as docked.
    pub fn insert_lot(&mut self, lot: ParkingLot) -> FleetResult<()> {
        if self.slot.contains_key(&lot.id) {
            return Err(FleetError::DuplicateParking(lot.id));
        }
        for v in lot.stock() {
            if let Some(at) = self.docked.insert(v, lot.id) {
                panic!("{v} docked in both {at} and {}", lot.id);
            }
        }
        self.slot.insert(lot.id, self.lots.len());
        self.lots.push(lot);
        Ok(())
    }

    // ── Core operations ───────────────────────────────────────────────────

    /// Remove and return the front vehicle of `parking`, or `None` if the
    /// stock is empty.  Never blocks.
    pub fn take(&mut self, parking: ParkingId) -> FleetResult<Option<VehicleId>> {
        let lot = self.lot_mut(parking)?;
        let taken = lot.stock.pop_front();
        if let Some(v) = taken {
            self.docked.remove(&v);
        }
        Ok(taken)
    }

    /// Append `vehicle` to the back of `parking`'s stock, even beyond
    /// capacity.
    ///
    /// # Panics
    /// Panics if `vehicle` is already docked anywhere (double release).
    pub fn put(&mut self, parking: ParkingId, vehicle: VehicleId) -> FleetResult<()> {
        self.dock(parking, vehicle)?;
        self.lot_mut(parking)?.stock.push_back(vehicle);
        Ok(())
    }

    /// Return `vehicle` to the **front** of `parking`'s stock, undoing a
    /// [`take`](Self::take).
    ///
    /// # Panics
    /// Panics if `vehicle` is already docked anywhere.
    pub fn put_front(&mut self, parking: ParkingId, vehicle: VehicleId) -> FleetResult<()> {
        self.dock(parking, vehicle)?;
        self.lot_mut(parking)?.stock.push_front(vehicle);
        Ok(())
    }

    /// Overflow neighbours of `parking`, in plan order.
    pub fn neighbors(&self, parking: ParkingId) -> FleetResult<&[ParkingId]> {
        Ok(&self.lot(parking)?.nearby)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn lot(&self, parking: ParkingId) -> FleetResult<&ParkingLot> {
        self.slot
            .get(&parking)
            .map(|&i| &self.lots[i])
            .ok_or(FleetError::UnknownParking(parking))
    }

    pub fn stock_len(&self, parking: ParkingId) -> FleetResult<usize> {
        Ok(self.lot(parking)?.len())
    }

    pub fn capacity(&self, parking: ParkingId) -> FleetResult<u32> {
        Ok(self.lot(parking)?.capacity)
    }

    pub fn is_at_capacity(&self, parking: ParkingId) -> FleetResult<bool> {
        Ok(self.lot(parking)?.is_at_capacity())
    }

    pub fn node(&self, parking: ParkingId) -> FleetResult<NodeId> {
        Ok(self.lot(parking)?.node)
    }

    /// FIFO view of `parking`'s stock, front first.
    pub fn stock(&self, parking: ParkingId) -> FleetResult<Vec<VehicleId>> {
        Ok(self.lot(parking)?.stock().collect())
    }

    /// The lot `vehicle` is docked at, or `None` if it is not docked.
    pub fn locate(&self, vehicle: VehicleId) -> Option<ParkingId> {
        self.docked.get(&vehicle).copied()
    }

    pub fn contains(&self, parking: ParkingId) -> bool {
        self.slot.contains_key(&parking)
    }

    /// All lots in plan order.
    pub fn lots(&self) -> impl Iterator<Item = &ParkingLot> + '_ {
        self.lots.iter()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Number of vehicles docked across all lots.
    pub fn docked_count(&self) -> usize {
        self.docked.len()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn lot_mut(&mut self, parking: ParkingId) -> FleetResult<&mut ParkingLot> {
        match self.slot.get(&parking) {
            Some(&i) => Ok(&mut self.lots[i]),
            None => Err(FleetError::UnknownParking(parking)),
        }
    }

    fn dock(&mut self, parking: ParkingId, vehicle: VehicleId) -> FleetResult<()> {
        if !self.slot.contains_key(&parking) {
            return Err(FleetError::UnknownParking(parking));
        }
        if let Some(at) = self.docked.insert(vehicle, parking) {
            panic!("double release: {vehicle} is already docked at {at}");
        }
        Ok(())
    }
}
