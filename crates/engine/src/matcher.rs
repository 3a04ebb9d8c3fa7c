use std::collections::HashMap;

use crate::model::{GeoKey, GeoStateKey, Table, FIELD_CITY, FIELD_PINCODE, FIELD_STATE};

/// Column indices for the key fields of one table. Missing columns read as
/// empty strings, keeping key construction total over any table.
#[derive(Debug, Clone, Copy)]
pub struct KeyColumns {
    city: Option<usize>,
    state: Option<usize>,
    pincode: Option<usize>,
}

impl KeyColumns {
    pub fn locate(table: &Table) -> Self {
        Self {
            city: table.column_index(FIELD_CITY),
            state: table.column_index(FIELD_STATE),
            pincode: table.column_index(FIELD_PINCODE),
        }
    }

    fn get(table: &Table, row: usize, col: Option<usize>) -> String {
        col.map(|c| table.cell(row, c).to_string()).unwrap_or_default()
    }

    pub fn geo_key(&self, table: &Table, row: usize) -> GeoKey {
        GeoKey {
            city: Self::get(table, row, self.city),
            pincode: Self::get(table, row, self.pincode),
        }
    }

    pub fn geo_state_key(&self, table: &Table, row: usize) -> GeoStateKey {
        GeoStateKey {
            city: Self::get(table, row, self.city),
            state: Self::get(table, row, self.state),
            pincode: Self::get(table, row, self.pincode),
        }
    }
}

/// De-duplicate the master on (city, pincode), mapping each key to the row
/// index of its first occurrence in master table order (first-seen, stable).
pub fn dedup_geo(master: &Table) -> HashMap<GeoKey, usize> {
    let cols = KeyColumns::locate(master);
    let mut map = HashMap::new();
    for row in 0..master.row_count() {
        map.entry(cols.geo_key(master, row)).or_insert(row);
    }
    map
}

/// De-duplicate the master on (city, state, pincode), first-seen wins.
pub fn dedup_geo_state(master: &Table) -> HashMap<GeoStateKey, usize> {
    let cols = KeyColumns::locate(master);
    let mut map = HashMap::new();
    for row in 0..master.row_count() {
        map.entry(cols.geo_state_key(master, row)).or_insert(row);
    }
    map
}
