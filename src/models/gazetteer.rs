/// Static state -> cities reference table used by the geographic matcher.
///
/// The table is immutable after construction and holds no interior
/// mutability, so a single instance can be shared across concurrent
/// lookups by reference.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
}

#[derive(Debug, Clone)]
pub struct GazetteerEntry {
    pub state: String,
    pub cities: Vec<String>,
}

impl Gazetteer {
    /// Build a gazetteer from explicit (state, cities) pairs, preserving
    /// their order.
    pub fn from_entries<S, C, I>(entries: I) -> Self
    where
        S: Into<String>,
        C: Into<String>,
        I: IntoIterator<Item = (S, Vec<C>)>,
    {
        Gazetteer {
            entries: entries
                .into_iter()
                .map(|(state, cities)| GazetteerEntry {
                    state: state.into(),
                    cities: cities.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    /// The built-in Indian states and cities table.
    pub fn india() -> Self {
        Gazetteer {
            entries: INDIA
                .iter()
                .map(|(state, cities)| GazetteerEntry {
                    state: (*state).to_string(),
                    cities: cities.iter().map(|c| (*c).to_string()).collect(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static INDIA: &[(&str, &[&str])] = &[
    (
        "Andhra Pradesh",
        &[
            "Visakhapatnam",
            "Vijayawada",
            "Guntur",
            "Nellore",
            "Tirupati",
            "Kakinada",
            "Rajahmundry",
            "Kurnool",
            "Anantapur",
        ],
    ),
    ("Assam", &["Guwahati", "Silchar", "Dibrugarh", "Jorhat", "Tezpur"]),
    ("Bihar", &["Patna", "Gaya", "Bhagalpur", "Muzaffarpur", "Darbhanga"]),
    ("Chhattisgarh", &["Raipur", "Bhilai", "Bilaspur", "Korba", "Durg"]),
    ("Delhi", &["New Delhi", "Delhi", "Dwarka", "Rohini"]),
    ("Goa", &["Panaji", "Margao", "Vasco da Gama", "Mapusa"]),
    (
        "Gujarat",
        &[
            "Ahmedabad",
            "Surat",
            "Vadodara",
            "Rajkot",
            "Bhavnagar",
            "Jamnagar",
            "Gandhinagar",
            "Junagadh",
            "Anand",
            "Navsari",
            "Bharuch",
        ],
    ),
    (
        "Haryana",
        &["Gurgaon", "Faridabad", "Panipat", "Ambala", "Karnal", "Rohtak", "Hisar"],
    ),
    ("Himachal Pradesh", &["Shimla", "Dharamshala", "Solan", "Mandi", "Kullu"]),
    ("Jammu and Kashmir", &["Srinagar", "Jammu", "Anantnag", "Baramulla"]),
    ("Jharkhand", &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro", "Hazaribagh"]),
    (
        "Karnataka",
        &[
            "Bangalore",
            "Mysore",
            "Hubli",
            "Mangalore",
            "Belgaum",
            "Gulbarga",
            "Davanagere",
            "Shimoga",
            "Udupi",
        ],
    ),
    (
        "Kerala",
        &[
            "Thiruvananthapuram",
            "Kochi",
            "Kozhikode",
            "Thrissur",
            "Kollam",
            "Kannur",
            "Alappuzha",
            "Palakkad",
        ],
    ),
    (
        "Madhya Pradesh",
        &["Bhopal", "Indore", "Gwalior", "Jabalpur", "Ujjain", "Sagar", "Ratlam"],
    ),
    (
        "Maharashtra",
        &[
            "Mumbai",
            "Pune",
            "Nagpur",
            "Nashik",
            "Thane",
            "Aurangabad",
            "Solapur",
            "Kolhapur",
            "Amravati",
            "Navi Mumbai",
        ],
    ),
    ("Odisha", &["Bhubaneswar", "Cuttack", "Rourkela", "Berhampur", "Sambalpur"]),
    (
        "Punjab",
        &["Ludhiana", "Amritsar", "Jalandhar", "Patiala", "Bathinda", "Chandigarh"],
    ),
    (
        "Rajasthan",
        &["Jaipur", "Jodhpur", "Udaipur", "Kota", "Ajmer", "Bikaner", "Alwar"],
    ),
    (
        "Tamil Nadu",
        &[
            "Chennai",
            "Coimbatore",
            "Madurai",
            "Tiruchirappalli",
            "Salem",
            "Tirunelveli",
            "Erode",
            "Vellore",
        ],
    ),
    ("Telangana", &["Hyderabad", "Warangal", "Nizamabad", "Karimnagar", "Secunderabad"]),
    (
        "Uttar Pradesh",
        &[
            "Lucknow",
            "Kanpur",
            "Varanasi",
            "Agra",
            "Meerut",
            "Allahabad",
            "Ghaziabad",
            "Noida",
            "Bareilly",
            "Aligarh",
            "Moradabad",
        ],
    ),
    ("Uttarakhand", &["Dehradun", "Haridwar", "Roorkee", "Haldwani", "Rishikesh"]),
    (
        "West Bengal",
        &["Kolkata", "Howrah", "Durgapur", "Asansol", "Siliguri", "Darjeeling"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn india_table_is_ordered_and_nonempty() {
        let gazetteer = Gazetteer::india();
        assert!(!gazetteer.is_empty());
        let states: Vec<&str> = gazetteer.entries().iter().map(|e| e.state.as_str()).collect();
        assert_eq!(states.first(), Some(&"Andhra Pradesh"));
        assert!(states.contains(&"Gujarat"));
    }

    #[test]
    fn from_entries_preserves_order() {
        let gazetteer = Gazetteer::from_entries(vec![
            ("First", vec!["One"]),
            ("Second", vec!["Two", "Three"]),
        ]);
        assert_eq!(gazetteer.entries()[0].state, "First");
        assert_eq!(gazetteer.entries()[1].cities, vec!["Two", "Three"]);
    }
}
