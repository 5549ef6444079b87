use std::fmt;
use std::str::FromStr;

/// Number of house types, and therefore the width of a one-hot type vector.
pub const NUM_TYPES: usize = 5;

/// Building type of a house. Closed set; the variant order fixes the one-hot
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HouseType {
    Duplex,
    Detached,
    SemiDetached,
    Townhouse,
    MultiFamily,
}

impl HouseType {
    pub const ALL: [HouseType; NUM_TYPES] = [
        HouseType::Duplex,
        HouseType::Detached,
        HouseType::SemiDetached,
        HouseType::Townhouse,
        HouseType::MultiFamily,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            HouseType::Duplex => "Duplex",
            HouseType::Detached => "Detached",
            HouseType::SemiDetached => "Semi-detached",
            HouseType::Townhouse => "Townhouse",
            HouseType::MultiFamily => "Multi-family",
        }
    }

    /// Indicator vector with a single 1 at this type's index.
    pub fn one_hot(self) -> [f64; NUM_TYPES] {
        let mut v = [0.0; NUM_TYPES];
        v[self.index()] = 1.0;
        v
    }
}

impl fmt::Display for HouseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HouseType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HouseType::ALL
            .into_iter()
            .find(|t| t.name() == s.trim())
            .ok_or(())
    }
}

/// Wall color of a house. Validated on load and kept on the record; the model
/// does not use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallColor {
    Brown,
    Yellow,
    White,
    Blue,
    Green,
}

impl WallColor {
    pub const ALL: [WallColor; 5] = [
        WallColor::Brown,
        WallColor::Yellow,
        WallColor::White,
        WallColor::Blue,
        WallColor::Green,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WallColor::Brown => "brown",
            WallColor::Yellow => "yellow",
            WallColor::White => "white",
            WallColor::Blue => "blue",
            WallColor::Green => "green",
        }
    }
}

impl FromStr for WallColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WallColor::ALL
            .into_iter()
            .find(|c| c.name() == s.trim())
            .ok_or(())
    }
}

/// One training example.
#[derive(Debug, Clone, PartialEq)]
pub struct House {
    pub square: f64,
    pub house_type: HouseType,
    pub price: f64,
    pub wall_color: WallColor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_hot_has_single_entry() {
        for t in HouseType::ALL {
            let v = t.one_hot();
            assert_eq!(v.iter().filter(|&&x| x == 1.0).count(), 1);
            assert_eq!(v.iter().sum::<f64>(), 1.0);
            assert_eq!(v[t.index()], 1.0);
        }
    }

    #[test]
    fn test_house_type_parse() {
        assert_eq!("Semi-detached".parse::<HouseType>(), Ok(HouseType::SemiDetached));
        assert_eq!(" Multi-family ".parse::<HouseType>(), Ok(HouseType::MultiFamily));
        assert_eq!("Castle".parse::<HouseType>(), Err(()));
        // Names are case-sensitive, matching the file format.
        assert_eq!("duplex".parse::<HouseType>(), Err(()));
    }

    #[test]
    fn test_wall_color_parse() {
        assert_eq!("green".parse::<WallColor>(), Ok(WallColor::Green));
        assert_eq!("purple".parse::<WallColor>(), Err(()));
        assert_eq!(" blue".parse::<WallColor>(), Ok(WallColor::Blue));
    }
}
