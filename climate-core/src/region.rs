use serde::Serialize;

use crate::error::CoreError;

/// A Gyeonggi province district with its administrative code and centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub name: &'static str,
    pub code: &'static str,
    pub lat: f64,
    pub lng: f64,
}

const fn region(name: &'static str, code: &'static str, lat: f64, lng: f64) -> Region {
    Region { name, code, lat, lng }
}

pub static GYEONGGI_REGIONS: [Region; 31] = [
    region("수원시", "41110", 37.2636, 127.0286),
    region("성남시", "41130", 37.4449, 127.1389),
    region("의정부시", "41150", 37.7381, 127.0337),
    region("안양시", "41170", 37.3943, 126.9568),
    region("부천시", "41190", 37.5034, 126.7660),
    region("광명시", "41210", 37.4786, 126.8644),
    region("평택시", "41220", 36.9921, 127.1127),
    region("동두천시", "41230", 37.9035, 127.0605),
    region("안산시", "41270", 37.3219, 126.8309),
    region("고양시", "41280", 37.6584, 126.8320),
    region("과천시", "41290", 37.4292, 126.9876),
    region("구리시", "41310", 37.5943, 127.1295),
    region("남양주시", "41360", 37.6360, 127.2165),
    region("오산시", "41370", 37.1498, 127.0775),
    region("시흥시", "41390", 37.3800, 126.8029),
    region("군포시", "41410", 37.3617, 126.9352),
    region("의왕시", "41430", 37.3449, 126.9683),
    region("하남시", "41450", 37.5393, 127.2148),
    region("용인시", "41460", 37.2411, 127.1776),
    region("파주시", "41480", 37.7600, 126.7800),
    region("이천시", "41500", 37.2720, 127.4350),
    region("안성시", "41550", 37.0080, 127.2797),
    region("김포시", "41570", 37.6152, 126.7156),
    region("화성시", "41590", 37.1996, 126.8312),
    region("광주시", "41610", 37.4095, 127.2550),
    region("양주시", "41630", 37.7853, 127.0458),
    region("포천시", "41650", 37.8949, 127.2002),
    region("여주시", "41670", 37.2983, 127.6374),
    region("연천군", "41800", 38.0966, 127.0750),
    region("가평군", "41820", 37.8315, 127.5095),
    region("양평군", "41830", 37.4917, 127.4872),
];

pub fn regions() -> &'static [Region] {
    &GYEONGGI_REGIONS
}

/// Look up a district by Korean name or administrative code.
pub fn find_region(name_or_code: &str) -> Result<&'static Region, CoreError> {
    let key = name_or_code.trim();

    GYEONGGI_REGIONS
        .iter()
        .find(|r| r.name == key || r.code == key)
        .ok_or_else(|| CoreError::RegionNotFound(key.to_string()))
}
