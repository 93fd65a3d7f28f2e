//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store` trait.

use std::path::Path;
use std::sync::Arc;

use helpdesk_core::{StaffId, TicketId, UserId};
use parking_lot::Mutex;
use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode,
    MultiThreaded, Options, WriteBatch,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::types::{
    AssignedTo, RaisedBy, Raiser, Staff, Ticket, TicketPriority, TicketStatus, User,
};
use crate::{Sequence, Store};

/// RocksDB-backed storage implementation.
///
/// Read-check-write sections (sequences, version checks, index moves) are
/// serialised by `write_lock`; plain reads never take it.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn get_record<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        key: &[u8],
    ) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// Collect the ticket ids of every index entry under `prefix`.
    fn scan_index(&self, cf_name: &str, prefix: &[u8]) -> Result<Vec<TicketId>> {
        let cf = self.cf(cf_name)?;

        let mut ids = Vec::new();
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, Direction::Forward));

        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            // Stop if we're past the prefix
            if !key.starts_with(prefix) {
                break;
            }

            match keys::extract_ticket_id(&key, prefix.len()) {
                Some(ticket_id) => ids.push(ticket_id),
                None => tracing::warn!(cf = cf_name, "Skipping malformed index key"),
            }
        }

        Ok(ids)
    }

    /// Resolve index hits into records from a primary column family.
    fn load_all<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        ticket_ids: Vec<TicketId>,
    ) -> Result<Vec<T>> {
        let mut records = Vec::with_capacity(ticket_ids.len());
        for ticket_id in ticket_ids {
            if let Some(record) = self.get_record(cf_name, &keys::ticket_key(ticket_id))? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Stage a ticket write and its index maintenance into `batch`.
    ///
    /// `previous` is the currently stored version of the ticket, if any.
    fn stage_ticket(
        &self,
        batch: &mut WriteBatch,
        ticket: &Ticket,
        previous: Option<&Ticket>,
    ) -> Result<()> {
        let cf_tickets = self.cf(cf::TICKETS)?;
        let cf_by_status = self.cf(cf::TICKETS_BY_STATUS)?;
        let cf_by_priority = self.cf(cf::TICKETS_BY_PRIORITY)?;

        let ticket_id = ticket.ticket_id;
        batch.put_cf(&cf_tickets, keys::ticket_key(ticket_id), Self::serialize(ticket)?);

        if let Some(old) = previous {
            if old.status != ticket.status {
                batch.delete_cf(
                    &cf_by_status,
                    keys::status_ticket_key(old.status.as_u8(), ticket_id),
                );
            }
            if old.priority != ticket.priority {
                batch.delete_cf(
                    &cf_by_priority,
                    keys::priority_ticket_key(old.priority.as_u8(), ticket_id),
                );
            }
        }
        batch.put_cf(
            &cf_by_status,
            keys::status_ticket_key(ticket.status.as_u8(), ticket_id),
            [],
        );
        batch.put_cf(
            &cf_by_priority,
            keys::priority_ticket_key(ticket.priority.as_u8(), ticket_id),
            [],
        );

        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Sequences
    // =========================================================================

    fn next_id(&self, sequence: Sequence) -> Result<u64> {
        let _guard = self.write_lock.lock();
        let cf = self.cf(cf::SEQUENCES)?;

        let current = self
            .db
            .get_cf(&cf, sequence.key())
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map_or(Ok(0), |data| {
                keys::decode_sequence_value(&data).ok_or_else(|| {
                    StoreError::Serialization(format!(
                        "corrupt {sequence:?} sequence counter ({} bytes)",
                        data.len()
                    ))
                })
            })?;
        let next = current + 1;

        self.db
            .put_cf(&cf, sequence.key(), keys::sequence_value(next))
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(next)
    }

    // =========================================================================
    // Ticket Operations
    // =========================================================================

    fn create_ticket(&self, ticket: &Ticket, raised_by: &RaisedBy) -> Result<()> {
        if raised_by.ticket_id != ticket.ticket_id {
            return Err(StoreError::Database(format!(
                "raised-by record for ticket {} does not belong to ticket {}",
                raised_by.ticket_id, ticket.ticket_id
            )));
        }

        let _guard = self.write_lock.lock();
        let ticket_key = keys::ticket_key(ticket.ticket_id);

        if self
            .get_record::<Ticket>(cf::TICKETS, &ticket_key)?
            .is_some()
        {
            return Err(StoreError::AlreadyExists);
        }
        if let Some(existing) = self.get_record::<RaisedBy>(cf::RAISED_BY, &ticket_key)? {
            return Err(StoreError::VersionConflict {
                expected: None,
                found: Some(existing.version),
            });
        }

        let cf_raised_by = self.cf(cf::RAISED_BY)?;

        let mut batch = WriteBatch::default();
        self.stage_ticket(&mut batch, ticket, None)?;
        batch.put_cf(&cf_raised_by, &ticket_key, Self::serialize(raised_by)?);

        match raised_by.raiser {
            Raiser::User(user_id) => {
                let cf_by_user = self.cf(cf::RAISED_BY_USER)?;
                batch.put_cf(
                    &cf_by_user,
                    keys::user_ticket_key(user_id, ticket.ticket_id),
                    [],
                );
            }
            Raiser::Staff(staff_id) => {
                let cf_by_staff = self.cf(cf::RAISED_BY_STAFF)?;
                batch.put_cf(
                    &cf_by_staff,
                    keys::staff_ticket_key(staff_id, ticket.ticket_id),
                    [],
                );
            }
        }

        self.write(batch)
    }

    fn get_ticket(&self, ticket_id: TicketId) -> Result<Option<Ticket>> {
        self.get_record(cf::TICKETS, &keys::ticket_key(ticket_id))
    }

    fn put_ticket(&self, ticket: &Ticket) -> Result<()> {
        let _guard = self.write_lock.lock();
        let previous = self
            .get_ticket(ticket.ticket_id)?
            .ok_or(StoreError::NotFound)?;

        let mut batch = WriteBatch::default();
        self.stage_ticket(&mut batch, ticket, Some(&previous))?;
        self.write(batch)
    }

    fn list_all_tickets(&self) -> Result<Vec<Ticket>> {
        let cf = self.cf(cf::TICKETS)?;

        let mut tickets = Vec::new();
        let iter = self.db.iterator_cf(&cf, IteratorMode::Start);

        for item in iter {
            let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            let ticket: Ticket = Self::deserialize(&value)?;
            tickets.push(ticket);
        }

        Ok(tickets)
    }

    fn list_tickets_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>> {
        let ids = self.scan_index(cf::TICKETS_BY_STATUS, &keys::status_prefix(status.as_u8()))?;
        self.load_all(cf::TICKETS, ids)
    }

    fn list_tickets_by_priority(&self, priority: TicketPriority) -> Result<Vec<Ticket>> {
        let ids = self.scan_index(
            cf::TICKETS_BY_PRIORITY,
            &keys::priority_prefix(priority.as_u8()),
        )?;
        self.load_all(cf::TICKETS, ids)
    }

    // =========================================================================
    // Raised-By Operations
    // =========================================================================

    fn get_raised_by(&self, ticket_id: TicketId) -> Result<Option<RaisedBy>> {
        self.get_record(cf::RAISED_BY, &keys::ticket_key(ticket_id))
    }

    fn list_raised_by_user(&self, user_id: UserId) -> Result<Vec<RaisedBy>> {
        let ids = self.scan_index(cf::RAISED_BY_USER, &keys::user_key(user_id))?;
        self.load_all(cf::RAISED_BY, ids)
    }

    fn list_raised_by_staff(&self, staff_id: StaffId) -> Result<Vec<RaisedBy>> {
        let ids = self.scan_index(cf::RAISED_BY_STAFF, &keys::staff_key(staff_id))?;
        self.load_all(cf::RAISED_BY, ids)
    }

    // =========================================================================
    // Assigned-To Operations
    // =========================================================================

    fn get_assignment(&self, ticket_id: TicketId) -> Result<Option<AssignedTo>> {
        self.get_record(cf::ASSIGNED_TO, &keys::ticket_key(ticket_id))
    }

    fn save_assignment(
        &self,
        ticket: &Ticket,
        staff_id: StaffId,
        expected_version: Option<u64>,
    ) -> Result<AssignedTo> {
        let _guard = self.write_lock.lock();
        let ticket_id = ticket.ticket_id;

        let previous_ticket = self.get_ticket(ticket_id)?.ok_or(StoreError::NotFound)?;
        let current = self.get_assignment(ticket_id)?;

        let found = current.as_ref().map(|a| a.version);
        if found != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                found,
            });
        }

        let assignment = AssignedTo {
            ticket_id,
            staff_id,
            version: expected_version.map_or(1, |v| v + 1),
        };

        let cf_assigned = self.cf(cf::ASSIGNED_TO)?;
        let cf_by_staff = self.cf(cf::ASSIGNED_TO_STAFF)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(
            &cf_assigned,
            keys::ticket_key(ticket_id),
            Self::serialize(&assignment)?,
        );

        // Move the staff index entry if the assignee changed
        if let Some(old) = current {
            if old.staff_id != staff_id {
                batch.delete_cf(&cf_by_staff, keys::staff_ticket_key(old.staff_id, ticket_id));
            }
        }
        batch.put_cf(&cf_by_staff, keys::staff_ticket_key(staff_id, ticket_id), []);

        self.stage_ticket(&mut batch, ticket, Some(&previous_ticket))?;
        self.write(batch)?;

        Ok(assignment)
    }

    fn list_assignments_by_staff(&self, staff_id: StaffId) -> Result<Vec<AssignedTo>> {
        let ids = self.scan_index(cf::ASSIGNED_TO_STAFF, &keys::staff_key(staff_id))?;
        self.load_all(cf::ASSIGNED_TO, ids)
    }

    // =========================================================================
    // Directory Operations
    // =========================================================================

    fn put_user(&self, user: &User) -> Result<()> {
        let cf = self.cf(cf::USERS)?;
        let key = keys::user_key(user.user_id);
        let value = Self::serialize(user)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_user(&self, user_id: UserId) -> Result<Option<User>> {
        self.get_record(cf::USERS, &keys::user_key(user_id))
    }

    fn put_staff(&self, staff: &Staff) -> Result<()> {
        let cf = self.cf(cf::STAFF)?;
        let key = keys::staff_key(staff.staff_id);
        let value = Self::serialize(staff)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_staff(&self, staff_id: StaffId) -> Result<Option<Staff>> {
        self.get_record(cf::STAFF, &keys::staff_key(staff_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn create_test_ticket(id: u64, status: TicketStatus, priority: TicketPriority) -> Ticket {
        let now = chrono::Utc::now();
        Ticket {
            ticket_id: TicketId::new(id),
            ticket_type: "hardware".to_string(),
            description: "laptop broken".to_string(),
            status,
            priority,
            created_at: now,
            updated_at: now,
        }
    }

    fn raised_by_user(id: u64, user: u64) -> RaisedBy {
        RaisedBy {
            ticket_id: TicketId::new(id),
            raiser: Raiser::User(UserId::new(user)),
            version: 1,
        }
    }

    #[test]
    fn sequences_start_at_one_and_are_independent() {
        let (store, _dir) = create_test_store();

        assert_eq!(store.next_id(Sequence::Tickets).unwrap(), 1);
        assert_eq!(store.next_id(Sequence::Tickets).unwrap(), 2);
        assert_eq!(store.next_id(Sequence::Staff).unwrap(), 1);
        assert_eq!(store.next_id(Sequence::Tickets).unwrap(), 3);
    }

    #[test]
    fn corrupt_sequence_is_an_error() {
        let (store, _dir) = create_test_store();
        assert_eq!(store.next_id(Sequence::Users).unwrap(), 1);

        let cf = store.cf(cf::SEQUENCES).unwrap();
        store.db.put_cf(&cf, Sequence::Users.key(), b"bad").unwrap();

        let result = store.next_id(Sequence::Users);
        assert!(matches!(result, Err(StoreError::Serialization(_))));
        // other counters are unaffected
        assert_eq!(store.next_id(Sequence::Tickets).unwrap(), 1);
    }

    #[test]
    fn create_ticket_writes_ticket_and_raiser() {
        let (store, _dir) = create_test_store();
        let ticket = create_test_ticket(1, TicketStatus::Open, TicketPriority::Medium);

        store.create_ticket(&ticket, &raised_by_user(1, 42)).unwrap();

        let retrieved = store.get_ticket(TicketId::new(1)).unwrap().unwrap();
        assert_eq!(retrieved, ticket);

        let raised_by = store.get_raised_by(TicketId::new(1)).unwrap().unwrap();
        assert_eq!(raised_by.raiser, Raiser::User(UserId::new(42)));

        let by_user = store.list_raised_by_user(UserId::new(42)).unwrap();
        assert_eq!(by_user.len(), 1);
        assert!(store.list_raised_by_staff(StaffId::new(42)).unwrap().is_empty());
    }

    #[test]
    fn create_ticket_twice_is_rejected() {
        let (store, _dir) = create_test_store();
        let ticket = create_test_ticket(1, TicketStatus::Open, TicketPriority::Medium);

        store.create_ticket(&ticket, &raised_by_user(1, 42)).unwrap();
        let result = store.create_ticket(&ticket, &raised_by_user(1, 43));
        assert!(matches!(result, Err(StoreError::AlreadyExists)));

        // First raiser is kept
        let by_user = store.list_raised_by_user(UserId::new(43)).unwrap();
        assert!(by_user.is_empty());
    }

    #[test]
    fn create_ticket_rejects_mismatched_raiser() {
        let (store, _dir) = create_test_store();
        let ticket = create_test_ticket(1, TicketStatus::Open, TicketPriority::Medium);

        let result = store.create_ticket(&ticket, &raised_by_user(2, 42));
        assert!(result.is_err());
        assert!(store.get_ticket(TicketId::new(1)).unwrap().is_none());
    }

    #[test]
    fn status_and_priority_indexes_follow_updates() {
        let (store, _dir) = create_test_store();
        let mut ticket = create_test_ticket(1, TicketStatus::Open, TicketPriority::Low);
        store.create_ticket(&ticket, &raised_by_user(1, 1)).unwrap();

        assert_eq!(store.list_tickets_by_status(TicketStatus::Open).unwrap().len(), 1);
        assert_eq!(store.list_tickets_by_priority(TicketPriority::Low).unwrap().len(), 1);

        ticket.status = TicketStatus::Resolved;
        ticket.priority = TicketPriority::High;
        store.put_ticket(&ticket).unwrap();

        assert!(store.list_tickets_by_status(TicketStatus::Open).unwrap().is_empty());
        assert!(store.list_tickets_by_priority(TicketPriority::Low).unwrap().is_empty());
        let resolved = store.list_tickets_by_status(TicketStatus::Resolved).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].priority, TicketPriority::High);
    }

    #[test]
    fn put_ticket_requires_existing() {
        let (store, _dir) = create_test_store();
        let ticket = create_test_ticket(9, TicketStatus::Open, TicketPriority::Low);

        assert!(matches!(store.put_ticket(&ticket), Err(StoreError::NotFound)));
    }

    #[test]
    fn list_all_tickets_in_id_order() {
        let (store, _dir) = create_test_store();
        for id in [3, 1, 300, 2] {
            let ticket = create_test_ticket(id, TicketStatus::Open, TicketPriority::Medium);
            store.create_ticket(&ticket, &raised_by_user(id, 1)).unwrap();
        }

        let ids: Vec<u64> = store
            .list_all_tickets()
            .unwrap()
            .iter()
            .map(|t| t.ticket_id.get())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 300]);
    }

    #[test]
    fn assignment_versions_and_staff_index() {
        let (store, _dir) = create_test_store();
        let mut ticket = create_test_ticket(1, TicketStatus::Open, TicketPriority::Medium);
        store.create_ticket(&ticket, &raised_by_user(1, 1)).unwrap();

        ticket.status = TicketStatus::InProgress;
        let first = store.save_assignment(&ticket, StaffId::new(7), None).unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(store.list_assignments_by_staff(StaffId::new(7)).unwrap().len(), 1);
        assert_eq!(
            store.list_tickets_by_status(TicketStatus::InProgress).unwrap().len(),
            1
        );

        let second = store
            .save_assignment(&ticket, StaffId::new(8), Some(1))
            .unwrap();
        assert_eq!(second.version, 2);
        assert!(store.list_assignments_by_staff(StaffId::new(7)).unwrap().is_empty());
        assert_eq!(store.list_assignments_by_staff(StaffId::new(8)).unwrap().len(), 1);
        assert_eq!(
            store.get_assignment(TicketId::new(1)).unwrap().unwrap().staff_id,
            StaffId::new(8)
        );
    }

    #[test]
    fn stale_assignment_is_a_conflict() {
        let (store, _dir) = create_test_store();
        let ticket = create_test_ticket(1, TicketStatus::Open, TicketPriority::Medium);
        store.create_ticket(&ticket, &raised_by_user(1, 1)).unwrap();

        store.save_assignment(&ticket, StaffId::new(7), None).unwrap();

        // A second writer that also read "no assignment" loses
        let result = store.save_assignment(&ticket, StaffId::new(8), None);
        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected: None,
                found: Some(1)
            })
        ));
        assert_eq!(
            store.get_assignment(TicketId::new(1)).unwrap().unwrap().staff_id,
            StaffId::new(7)
        );
    }

    #[test]
    fn assignment_requires_ticket() {
        let (store, _dir) = create_test_store();
        let ticket = create_test_ticket(5, TicketStatus::Open, TicketPriority::Medium);

        let result = store.save_assignment(&ticket, StaffId::new(7), None);
        assert!(matches!(result, Err(StoreError::NotFound)));
        assert!(store.get_assignment(TicketId::new(5)).unwrap().is_none());
    }

    #[test]
    fn directory_crud() {
        let (store, _dir) = create_test_store();

        let user = User {
            user_id: UserId::new(1),
            name: "Ada".to_string(),
        };
        let staff = Staff {
            staff_id: StaffId::new(1),
            name: "Grace".to_string(),
        };
        store.put_user(&user).unwrap();
        store.put_staff(&staff).unwrap();

        assert_eq!(store.get_user(UserId::new(1)).unwrap(), Some(user));
        assert_eq!(store.get_staff(StaffId::new(1)).unwrap(), Some(staff));
        assert!(store.get_user(UserId::new(2)).unwrap().is_none());
    }
}
