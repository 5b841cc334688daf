// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

/// Review interval in hours, indexed by level.
const INTERVAL_HOURS: [i64; 6] = [1, 24, 72, 168, 336, 720];

/// How familiar a card is: 0 is new or hardest, 5 is most familiar.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(0);
    pub const MAX: Level = Level(5);

    /// Build a level, clamping out-of-range values into [0, 5].
    pub fn new(value: i64) -> Self {
        Self(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn promote(self) -> Self {
        Self::new(self.0 as i64 + 1)
    }

    pub fn demote(self) -> Self {
        Self::new(self.0 as i64 - 1)
    }

    /// How long to wait before the next review of a card at this level.
    pub fn interval(self) -> Duration {
        Duration::hours(INTERVAL_HOURS[self.0 as usize])
    }
}

impl From<i64> for Level {
    fn from(value: i64) -> Self {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
