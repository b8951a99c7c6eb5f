//! Value pools for synthetic records

pub const FIRST_NAMES_FEMALE: &[&str] = &[
    "Amahle", "Lerato", "Naledi", "Zanele", "Thandiwe", "Ayanda", "Palesa", "Chloe", "Megan",
    "Lindiwe", "Refilwe", "Kayla", "Nomvula", "Busisiwe", "Anika", "Keabetswe",
];

pub const FIRST_NAMES_MALE: &[&str] = &[
    "Sipho", "Thabo", "Bongani", "Kagiso", "Lwazi", "Tshepo", "Liam", "Ethan", "Mandla",
    "Kabelo", "Johan", "Themba", "Neo", "Musa", "Pieter", "Sibusiso",
];

pub const SURNAMES: &[&str] = &[
    "Nkosi", "Dlamini", "Mokoena", "Naidoo", "van der Merwe", "Botha", "Khumalo", "Mahlangu",
    "Pillay", "Ndlovu", "Mthembu", "Smith", "Pretorius", "Zulu", "Molefe", "Jacobs",
];

pub const PROVINCES: &[&str] = &[
    "Gauteng", "Western Cape", "KwaZulu-Natal", "Eastern Cape", "Free State",
];

/// Fixed school roster: (id, name)
pub const SCHOOLS: &[(u32, &str)] = &[
    (1000, "Sunridge High School"),
    (1001, "Riverside College"),
    (1002, "Mountainview Secondary School"),
];

/// Staff roles in roster order; one record per entry
pub const STAFF_ROLES: &[&str] = &[
    "Principal",
    "Deputy Principal",
    "Deputy Principal",
    "Educator",
    "Educator",
    "Educator",
    "Educator",
    "Educator",
    "Educator",
    "Educator",
    "Educator",
    "Educator",
    "Educator",
    "Administrator",
    "Administrator",
];

/// Subjects for the senior phase (grades 8 and 9): (code, name)
pub const SENIOR_PHASE_SUBJECTS: &[(&str, &str)] = &[
    ("ENG-HL", "English Home Language"),
    ("AFR-FAL", "Afrikaans First Additional Language"),
    ("MATH", "Mathematics"),
    ("NS", "Natural Sciences"),
    ("SS", "Social Sciences"),
    ("TECH", "Technology"),
    ("EMS", "Economic and Management Sciences"),
    ("LO", "Life Orientation"),
    ("CA", "Creative Arts"),
];

/// Subjects for the FET phase (grades 10 to 12): (code, name)
pub const FET_PHASE_SUBJECTS: &[(&str, &str)] = &[
    ("ENG-HL", "English Home Language"),
    ("AFR-FAL", "Afrikaans First Additional Language"),
    ("MATH", "Mathematics"),
    ("LO", "Life Orientation"),
    ("PHSC", "Physical Sciences"),
    ("LFSC", "Life Sciences"),
    ("GEO", "Geography"),
];

pub const RACES: &[(&str, &str)] = &[
    ("A", "African"),
    ("C", "Coloured"),
    ("I", "Indian"),
    ("W", "White"),
    ("O", "Other"),
];

pub const LANGUAGES: &[(&str, &str)] = &[
    ("ENG", "English"),
    ("AFR", "Afrikaans"),
    ("ZUL", "isiZulu"),
    ("XHO", "isiXhosa"),
    ("SOT", "Sesotho"),
    ("TSN", "Setswana"),
];

pub const RELATIONSHIPS: &[(&str, &str)] = &[
    ("MOTHER", "Mother"),
    ("FATHER", "Father"),
    ("GUARDIAN", "Guardian"),
];
