//! Check-in (打卡) records and rules
//!
//! Rules and daily reports are passed through as JSON.

use serde::{Deserialize, Serialize};

use crate::wx::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckinType {
    Commute = 1,
    Outside = 2,
    All = 3,
}

#[derive(Debug, Clone, Serialize)]
struct CheckinDataRequest {
    opencheckindatatype: u8,
    starttime: i64,
    endtime: i64,
    useridlist: Vec<String>,
}

#[non_exhaustive]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckinRecord {
    pub userid: String,
    pub groupname: String,
    pub checkin_type: String,
    pub exception_type: String,
    pub checkin_time: i64,
    pub location_title: String,
    pub location_detail: String,
    pub wifiname: String,
    pub wifimac: String,
    pub notes: String,
    pub mediaids: Vec<String>,
    pub lat: i64,
    pub lng: i64,
    pub deviceid: String,
    pub sch_checkin_time: i64,
    pub groupid: i64,
    pub schedule_id: i64,
    pub timeline_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinData {
    #[serde(default)]
    pub checkindata: Vec<CheckinRecord>,
}

#[derive(Debug, Clone, Serialize)]
struct CheckinOptionRequest {
    datetime: i64,
    useridlist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinOptions {
    #[serde(default)]
    pub info: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DayDataRequest {
    starttime: i64,
    endtime: i64,
    useridlist: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DayData {
    #[serde(default)]
    pub datas: Vec<serde_json::Value>,
}

/// Raw punches of up to 100 users over at most 30 days.
pub fn checkin_data(
    checkin_type: CheckinType,
    starttime: i64,
    endtime: i64,
    useridlist: Vec<String>,
) -> Action<CheckinData> {
    Action::post("/cgi-bin/checkin/getcheckindata").json(CheckinDataRequest {
        opencheckindatatype: checkin_type as u8,
        starttime,
        endtime,
        useridlist,
    })
}

/// Rules applying to each user on the day containing `datetime`.
pub fn checkin_option(datetime: i64, useridlist: Vec<String>) -> Action<CheckinOptions> {
    Action::post("/cgi-bin/checkin/getcheckinoption").json(CheckinOptionRequest {
        datetime,
        useridlist,
    })
}

/// Daily summary reports.
pub fn day_data(starttime: i64, endtime: i64, useridlist: Vec<String>) -> Action<DayData> {
    Action::post("/cgi-bin/checkin/getcheckin_daydata").json(DayDataRequest {
        starttime,
        endtime,
        useridlist,
    })
}
