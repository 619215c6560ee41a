//! Access control and reentrancy protection for state-mutating entry points.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::ops::Bound;

use cosmwasm_std::{Addr, DepsMut, Order, Record, Storage};

use crate::error::ContractError;
use crate::state::{Config, ENTERED};

pub fn ensure_admin(config: &Config, sender: &Addr, reason: &str) -> Result<(), ContractError> {
    if *sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: reason.to_string(),
        });
    }
    Ok(())
}

pub fn ensure_oracle(config: &Config, sender: &Addr) -> Result<(), ContractError> {
    if *sender != config.oracle {
        return Err(ContractError::Unauthorized {
            reason: "only the oracle can fulfil randomness".to_string(),
        });
    }
    Ok(())
}

/// Run `f` as one protected, all-or-nothing call.
///
/// The guard flag is raised inside a write-buffering transaction over the
/// contract storage. Any nested call made through an external collaborator
/// receives that transaction, sees the flag and fails with `ReentrantCall`.
/// Writes reach the underlying storage only if `f` succeeds; the flag itself
/// is never committed, so it is released on every exit path.
pub fn non_reentrant<T, F>(deps: DepsMut, f: F) -> Result<T, ContractError>
where
    F: FnOnce(DepsMut) -> Result<T, ContractError>,
{
    let DepsMut {
        storage,
        api,
        querier,
    } = deps;

    if ENTERED.may_load(storage)?.unwrap_or(false) {
        return Err(ContractError::ReentrantCall);
    }

    let mut txn = StorageTransaction::new(storage);
    ENTERED.save(&mut txn, &true)?;

    let result = f(DepsMut {
        storage: &mut txn,
        api,
        querier,
    })?;

    ENTERED.remove(&mut txn);
    txn.commit();
    Ok(result)
}

/// Buffers writes on top of a base storage until `commit`.
pub struct StorageTransaction<'a> {
    base: &'a mut dyn Storage,
    /// `None` marks a pending removal
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> StorageTransaction<'a> {
    pub fn new(base: &'a mut dyn Storage) -> Self {
        StorageTransaction {
            base,
            writes: BTreeMap::new(),
        }
    }

    pub fn commit(self) {
        let StorageTransaction { base, writes } = self;
        for (key, value) in writes {
            match value {
                Some(value) => base.set(&key, &value),
                None => base.remove(&key),
            }
        }
    }
}

impl Storage for StorageTransaction<'_> {
    fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.writes.get(key) {
            Some(pending) => pending.clone(),
            None => self.base.get(key),
        }
    }

    fn range<'b>(
        &'b self,
        start: Option<&[u8]>,
        end: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        if let (Some(s), Some(e)) = (start, end) {
            if s >= e {
                return Box::new(std::iter::empty());
            }
        }

        let bounds = (
            start.map_or(Bound::Unbounded, |s| Bound::Included(s.to_vec())),
            end.map_or(Bound::Unbounded, |e| Bound::Excluded(e.to_vec())),
        );
        let pending = self.writes.range::<Vec<u8>, _>(bounds);
        let pending: PendingIter<'b> = match order {
            Order::Ascending => Box::new(pending),
            Order::Descending => Box::new(pending.rev()),
        };

        Box::new(MergedRange {
            base: self.base.range(start, end, order).peekable(),
            pending: pending.peekable(),
            order,
        })
    }

    fn set(&mut self, key: &[u8], value: &[u8]) {
        self.writes.insert(key.to_vec(), Some(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }
}

type PendingIter<'b> = Box<dyn Iterator<Item = (&'b Vec<u8>, &'b Option<Vec<u8>>)> + 'b>;

/// Walks the base range and the buffered writes side by side, one key at a
/// time. A buffered write shadows the base entry with the same key.
struct MergedRange<'b> {
    base: Peekable<Box<dyn Iterator<Item = Record> + 'b>>,
    pending: Peekable<PendingIter<'b>>,
    order: Order,
}

enum Step {
    Base,
    Pending,
    Shadowed,
}

impl Iterator for MergedRange<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let step = match (self.base.peek(), self.pending.peek()) {
                (None, None) => return None,
                (Some(_), None) => Step::Base,
                (None, Some(_)) => Step::Pending,
                (Some((base_key, _)), Some((pending_key, _))) => {
                    let ord = base_key.as_slice().cmp(pending_key.as_slice());
                    let ord = match self.order {
                        Order::Ascending => ord,
                        Order::Descending => ord.reverse(),
                    };
                    match ord {
                        Ordering::Less => Step::Base,
                        Ordering::Greater => Step::Pending,
                        Ordering::Equal => Step::Shadowed,
                    }
                }
            };

            match step {
                Step::Base => return self.base.next(),
                Step::Shadowed => {
                    self.base.next();
                }
                Step::Pending => {}
            }
            if let Some((key, Some(value))) = self.pending.next() {
                return Some((key.clone(), value.clone()));
            }
        }
    }
}
