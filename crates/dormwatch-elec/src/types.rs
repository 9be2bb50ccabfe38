// SPDX-FileCopyrightText: 2026 Dormwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request types and the form envelope expected by the portal endpoint.

use std::time::Duration;

use dormwatch_config::model::DEFAULT_TRANSIENT_MESSAGE;
use dormwatch_config::{ElecSettings, RoomConfig};
use dormwatch_core::DormwatchError;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Function name the portal dispatches on.
pub const FUNNAME: &str = "synjones.onecard.query.elec.roominfo";

/// Account identifiers shared by every room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub aid: String,
    pub account: String,
    pub area: String,
}

/// Portal identifiers for one room plus its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub label: String,
    pub building_id: String,
    pub building: String,
    pub floor_id: String,
    pub floor: String,
    pub room_id: String,
    pub room: String,
}

impl From<&RoomConfig> for Room {
    fn from(config: &RoomConfig) -> Self {
        Self {
            label: config.name.clone(),
            building_id: config.building_id.clone(),
            building: config.building.clone(),
            floor_id: config.floor_id.clone(),
            floor: config.floor.clone(),
            room_id: config.room_id.clone(),
            room: config.room.clone(),
        }
    }
}

/// One balance query, immutable for the lifetime of a run.
#[derive(Debug)]
pub struct QueryRequest {
    pub endpoint: String,
    pub session_id: SecretString,
    pub account: Account,
    pub room: Room,
}

impl QueryRequest {
    /// Builds the request for `room` from resolved job settings.
    pub fn for_room(settings: &ElecSettings, room: &RoomConfig) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            session_id: SecretString::from(settings.session_id.expose_secret().to_string()),
            account: Account {
                aid: settings.aid.clone(),
                account: settings.account.clone(),
                area: settings.area.clone(),
            },
            room: Room::from(room),
        }
    }

    /// Compact JSON of the query parameters (the `jsondata` field).
    pub fn jsondata(&self) -> Result<String, DormwatchError> {
        let envelope = QueryEnvelope {
            query_elec_roominfo: RoomInfoQuery {
                aid: &self.account.aid,
                account: &self.account.account,
                room: RoomRef {
                    roomid: &self.room.room_id,
                    room: &self.room.room,
                },
                floor: FloorRef {
                    floorid: &self.room.floor_id,
                    floor: &self.room.floor,
                },
                area: AreaRef {
                    area: &self.account.area,
                    areaname: &self.account.area,
                },
                building: BuildingRef {
                    buildingid: &self.room.building_id,
                    building: &self.room.building,
                },
            },
        };
        serde_json::to_string(&envelope).map_err(|e| DormwatchError::Internal(format!(
            "failed to serialize query parameters: {e}"
        )))
    }

    /// The full form-encoded request body.
    pub fn form_body(&self) -> Result<String, DormwatchError> {
        let jsondata = self.jsondata()?;
        serde_urlencoded::to_string(vec![
            ("jsondata", jsondata.as_str()),
            ("funname", FUNNAME),
            ("json", "true"),
        ])
        .map_err(|e| DormwatchError::Internal(format!("failed to encode form body: {e}")))
    }
}

/// Attempt budget and the message that triggers another attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub transient_message: String,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            transient_message: DEFAULT_TRANSIENT_MESSAGE.to_string(),
        }
    }
}

impl From<&ElecSettings> for RetryPolicy {
    fn from(settings: &ElecSettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            retry_delay: settings.retry_delay,
            transient_message: settings.transient_message.clone(),
        }
    }
}

#[derive(Serialize)]
struct QueryEnvelope<'a> {
    query_elec_roominfo: RoomInfoQuery<'a>,
}

#[derive(Serialize)]
struct RoomInfoQuery<'a> {
    aid: &'a str,
    account: &'a str,
    room: RoomRef<'a>,
    floor: FloorRef<'a>,
    area: AreaRef<'a>,
    building: BuildingRef<'a>,
}

#[derive(Serialize)]
struct RoomRef<'a> {
    roomid: &'a str,
    room: &'a str,
}

#[derive(Serialize)]
struct FloorRef<'a> {
    floorid: &'a str,
    floor: &'a str,
}

#[derive(Serialize)]
struct AreaRef<'a> {
    area: &'a str,
    areaname: &'a str,
}

#[derive(Serialize)]
struct BuildingRef<'a> {
    buildingid: &'a str,
    building: &'a str,
}
