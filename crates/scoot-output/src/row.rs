//! Plain data row types written by output backends.
//!
//! Ids are written as their raw integers and times as Unix seconds, so the
//! tables join against the plan's CSV files directly.

/// One realized ride.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealizedRideRow {
    pub ride_id:           u32,
    pub request_id:        u32,
    pub rider_id:          u32,
    pub vehicle_id:        u32,
    pub origin_id:         u32,
    pub destination_id:    u32,
    pub desired_unix_secs: i64,
    pub start_unix_secs:   i64,
    pub end_unix_secs:     i64,
    pub distance_m:        f64,
    pub duration_secs:     u64,
    pub promo_used:        bool,
    pub search_secs:       u64,
    pub attempts:          u32,
}

/// One cancelled ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelledRideRow {
    pub ride_id:           u32,
    pub request_id:        u32,
    pub rider_id:          u32,
    pub origin_id:         u32,
    pub desired_unix_secs: i64,
    pub search_secs:       u64,
    pub attempts:          u32,
}

/// One ride abandoned after its vehicle was taken; the vehicle went back to
/// `origin_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnroutableRideRow {
    pub request_id:     u32,
    pub rider_id:       u32,
    pub vehicle_id:     u32,
    pub origin_id:      u32,
    pub destination_id: u32,
    pub unix_time_secs: i64,
    /// `no_route` or `duration_overflow`.
    pub reason:         &'static str,
}

/// Stock of one parking location at a snapshot time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkingStockRow {
    pub parking_id:     u32,
    pub unix_time_secs: i64,
    pub lat:            f64,
    pub lon:            f64,
    pub capacity:       u32,
    pub stock:          u32,
}

/// Where one vehicle is at a snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleRow {
    pub vehicle_id:     u32,
    pub unix_time_secs: i64,
    pub hardware_id:    String,
    /// Lot the vehicle is docked at; `u32::MAX` while in transit.
    pub parking_id:     u32,
    pub in_transit:     bool,
    /// Fraction of the current trip completed; 0 when docked.
    pub progress:       f32,
    pub distance_m:     f64,
}

/// Activity on one processed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:           u64,
    pub unix_time_secs: i64,
    pub woken:          u64,
    pub dispatched:     u64,
    pub live_actors:    u64,
}
