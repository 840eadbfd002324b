//! Station chain walk: discovers the stations shown around the reference train.

use std::collections::VecDeque;
use std::rc::Rc;
use super::cache::StationCache;
use super::cancel::CancellationToken;
use super::GraphError;
use crate::api::TimetableSource;
use crate::logging::log;
use crate::models::{StationId, Stop};

/// One walked station
#[derive(Debug, Clone, PartialEq)]
pub struct PostRecord {
    /// Position relative to the reference station (0 = reference)
    pub offset: i32,
    pub station_id: StationId,
    /// Full timetable of the station
    pub all_rows: Rc<Vec<Stop>>,
    /// The reference train's row within `all_rows`
    pub matched_row: Stop,
}

impl PostRecord {
    /// Axis label of this station
    #[must_use]
    pub fn name(&self) -> String {
        self.matched_row.display_name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward increasing offsets, following `to_station_id`
    Forward,
    /// Toward decreasing offsets, following `from_station_id`
    Backward,
}

/// A station the walk needs before it can continue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkRequest {
    pub direction: Direction,
    pub station: StationId,
}

/// Walk state: records held by offset with one cursor per direction
///
/// Each round tries to extend forward, re-checks the size cap, then tries to
/// extend backward. A direction closes for good when the reference train has
/// no link that way, the station cannot be fetched, or the train is missing
/// from the fetched timetable.
#[derive(Debug, Clone)]
pub struct ChainWalk {
    reference_train: String,
    target: usize,
    records: VecDeque<PostRecord>,
    forward_closed: bool,
    backward_closed: bool,
    next_direction: Direction,
}

fn find_train<'a>(rows: &'a [Stop], train_number: &str) -> Option<&'a Stop> {
    rows.iter().find(|row| row.train_number == train_number)
}

impl ChainWalk {
    /// Start a walk at the reference station
    ///
    /// # Errors
    ///
    /// Returns `GraphError::ReferenceTrainMissing` if the reference train has
    /// no row in the seed timetable.
    pub fn seed(
        reference_station: StationId,
        reference_train: &str,
        seed_timetable: Rc<Vec<Stop>>,
        target: usize,
    ) -> Result<Self, GraphError> {
        let matched_row = find_train(&seed_timetable, reference_train)
            .cloned()
            .ok_or_else(|| GraphError::ReferenceTrainMissing {
                train: reference_train.to_string(),
                station: reference_station.clone(),
            })?;

        let mut records = VecDeque::with_capacity(target.max(1));
        records.push_back(PostRecord {
            offset: 0,
            station_id: reference_station,
            all_rows: seed_timetable,
            matched_row,
        });

        Ok(Self {
            reference_train: reference_train.to_string(),
            target: target.max(1),
            records,
            forward_closed: false,
            backward_closed: false,
            next_direction: Direction::Forward,
        })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.records.len() >= self.target || (self.forward_closed && self.backward_closed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.forward_closed,
            Direction::Backward => self.backward_closed,
        }
    }

    fn first_offset(&self) -> i32 {
        self.records.front().map_or(0, |r| r.offset)
    }

    /// Record at `offset`, if the walk reached it
    #[must_use]
    pub fn record_at(&self, offset: i32) -> Option<&PostRecord> {
        let index = usize::try_from(offset - self.first_offset()).ok()?;
        self.records.get(index)
    }

    fn close(&mut self, direction: Direction) {
        log!("Closing {:?} walk for train {}", direction, self.reference_train);
        match direction {
            Direction::Forward => self.forward_closed = true,
            Direction::Backward => self.backward_closed = true,
        }
    }

    /// Next station to fetch, or `None` once the walk is complete
    ///
    /// Directions without a route link are closed on the way.
    pub fn next_request(&mut self) -> Option<WalkRequest> {
        loop {
            if self.is_complete() {
                return None;
            }

            let direction = self.next_direction;
            self.next_direction = match direction {
                Direction::Forward => Direction::Backward,
                Direction::Backward => Direction::Forward,
            };

            if self.is_closed(direction) {
                continue;
            }

            let edge = match direction {
                Direction::Forward => self.records.back(),
                Direction::Backward => self.records.front(),
            };
            let link = edge.and_then(|record| match direction {
                Direction::Forward => record.matched_row.next_station(),
                Direction::Backward => record.matched_row.previous_station(),
            });

            match link {
                Some(station) => {
                    return Some(WalkRequest {
                        direction,
                        station: station.clone(),
                    })
                }
                None => self.close(direction),
            }
        }
    }

    /// Feed the timetable fetched for `request`; `None` means the fetch failed
    pub fn accept(&mut self, request: WalkRequest, rows: Option<Rc<Vec<Stop>>>) {
        let Some(rows) = rows.filter(|rows| !rows.is_empty()) else {
            self.close(request.direction);
            return;
        };
        let Some(matched_row) = find_train(&rows, &self.reference_train).cloned() else {
            self.close(request.direction);
            return;
        };

        match request.direction {
            Direction::Forward => {
                let offset = self.records.back().map_or(0, |r| r.offset) + 1;
                self.records.push_back(PostRecord {
                    offset,
                    station_id: request.station,
                    all_rows: rows,
                    matched_row,
                });
            }
            Direction::Backward => {
                let offset = self.first_offset() - 1;
                self.records.push_front(PostRecord {
                    offset,
                    station_id: request.station,
                    all_rows: rows,
                    matched_row,
                });
            }
        }
    }

    /// Records in offset order
    #[must_use]
    pub fn into_records(self) -> Vec<PostRecord> {
        self.records.into()
    }
}

/// Walk outward from the reference station, fetching neighbours one at a time
///
/// The cache is consulted before every fetch; successful non-empty fetches
/// are stored in it. Failed fetches are logged and close their direction.
///
/// # Errors
///
/// Returns `GraphError::ReferenceTrainMissing` when the seed timetable lacks
/// the reference train, and `GraphError::Cancelled` when `token` is cancelled
/// while a fetch is in flight.
#[allow(clippy::too_many_arguments)]
pub async fn walk<S: TimetableSource>(
    source: &S,
    cache: &StationCache,
    snapshot_id: &str,
    reference_station: &StationId,
    reference_train: &str,
    seed_timetable: Rc<Vec<Stop>>,
    target: usize,
    token: &CancellationToken,
) -> Result<Vec<PostRecord>, GraphError> {
    let mut chain = ChainWalk::seed(reference_station.clone(), reference_train, seed_timetable, target)?;

    while let Some(request) = chain.next_request() {
        let rows = if let Some(cached) = cache.get(&request.station) {
            log!("Cache hit for station {}", request.station);
            Some(cached)
        } else {
            log!("Fetching station {} ({:?})", request.station, request.direction);
            let fetched = source.station_timetable(&request.station, snapshot_id).await;
            if token.is_cancelled() {
                return Err(GraphError::Cancelled);
            }
            match fetched {
                Ok(rows) if rows.is_empty() => None,
                Ok(rows) => Some(cache.insert(request.station.clone(), rows)),
                Err(e) => {
                    leptos::logging::warn!("Failed to fetch station {}: {}", request.station, e);
                    None
                }
            }
        };
        chain.accept(request, rows);
    }

    Ok(chain.into_records())
}

/// Whether a train number is even, read the way `parseInt` reads it
///
/// Leading whitespace and sign are skipped and only the leading run of digits
/// counts; a number without leading digits is not even.
#[must_use]
pub fn is_even_train_number(train_number: &str) -> bool {
    let trimmed = train_number.trim_start();
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .last()
        .and_then(|digit| digit.to_digit(10))
        .is_some_and(|digit| digit % 2 == 0)
}

/// Records in station-axis order: even train numbers run the opposite way
#[must_use]
pub fn order_for_train(mut records: Vec<PostRecord>, reference_train: &str) -> Vec<PostRecord> {
    if is_even_train_number(reference_train) {
        records.reverse();
    }
    records
}
