//! Named search anchors used by the regional sweep.
//!
//! One or more city centres per province so a 50 km radius around each
//! covers the main population areas.

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

const fn anchor(name: &'static str, latitude: f64, longitude: f64) -> Anchor {
    Anchor {
        name,
        coordinate: Coordinate::new(latitude, longitude),
    }
}

pub const SOUTH_AFRICA_ANCHORS: &[Anchor] = &[
    // Eastern Cape
    anchor("Port Elizabeth", -33.925_8, 25.567_6),
    anchor("East London", -32.969_9, 27.861_8),
    anchor("Uitenhage", -33.740_4, 25.412_4),
    anchor("Queenstown", -31.559_5, 27.825_1),
    anchor("Mthatha", -31.590_4, 29.287_5),
    anchor("Grahamstown", -33.227_8, 27.916_7),
    // Free State
    anchor("Bloemfontein", -29.085_2, 26.159_6),
    anchor("Welkom", -28.308_9, 27.873_2),
    anchor("Virginia", -28.556_9, 25.923_3),
    anchor("Kroonstad", -27.699_0, 27.229_3),
    anchor("Bethlehem", -28.550_0, 25.950_0),
    // Gauteng
    anchor("Johannesburg", -26.202_3, 28.047_7),
    anchor("Pretoria", -25.706_9, 28.229_4),
    anchor("Midrand", -26.066_7, 28.121_7),
    anchor("Centurion", -25.854_6, 28.187_8),
    anchor("Tshwane", -26.195_2, 28.034_0),
    anchor("Soweto", -26.300_4, 27.970_0),
    // KwaZulu-Natal
    anchor("Durban", -29.858_7, 31.021_8),
    anchor("Pietermaritzburg", -29.622_8, 30.394_9),
    anchor("Newcastle", -27.751_8, 29.930_0),
    anchor("Ladysmith", -28.550_0, 29.780_0),
    anchor("Richards Bay", -30.290_9, 30.881_4),
    // Limpopo
    anchor("Polokwane", -23.901_1, 29.460_8),
    anchor("Thohoyandou", -22.973_6, 30.498_8),
    anchor("Musina", -22.321_4, 30.469_8),
    anchor("Mokopane", -24.183_3, 29.016_7),
    anchor("Tzaneen", -23.040_0, 30.230_0),
    // Mpumalanga
    anchor("Nelspruit", -25.465_7, 30.929_8),
    anchor("White River", -25.346_7, 30.857_0),
    anchor("Hazyview", -25.094_7, 30.857_0),
    anchor("Sabie", -25.119_6, 30.142_0),
    anchor("Barberton", -25.628_2, 30.454_1),
    // North West
    anchor("Rustenburg", -25.663_0, 25.517_0),
    anchor("Brits", -25.630_0, 27.780_0),
    anchor("Potchefstroom", -26.715_2, 27.091_6),
    anchor("Klerksdorp", -26.866_7, 26.666_7),
    anchor("Mahikeng", -25.930_0, 25.650_0),
    // Northern Cape
    anchor("Kimberley", -28.728_2, 24.749_9),
    anchor("Upington", -28.447_8, 21.259_4),
    anchor("Springbok", -29.666_7, 17.883_3),
    anchor("Northern Cape", -28.750_0, 24.770_0),
    anchor("Calvinia", -30.750_0, 22.050_0),
    // Western Cape
    anchor("Cape Town", -33.924_9, 18.424_1),
    anchor("Stellenbosch", -33.933_6, 18.865_3),
    anchor("Paarl", -33.734_1, 18.970_0),
    anchor("Mossel Bay", -34.081_7, 22.140_9),
    anchor("Worcester", -33.611_2, 19.457_2),
];
