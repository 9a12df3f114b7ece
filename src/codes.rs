//! Lookup tables translating exporter codes into the layer manual's codes.

/// Phase designation from phase letters, either `R/S/T` or `A/B/C`.
///
/// ```txt
/// +--------------+------+
/// |    phases    | code |
/// +--------------+------+
/// |  C (T)       |  1   |
/// |  B (S)       |  2   |
/// |  BC (ST)     |  3   |
/// |  A (R)       |  4   |
/// |  AC (RT)     |  5   |
/// |  AB (RS)     |  6   |
/// |  ABC (RST)   |  7   |
/// +--------------+------+
/// ```
pub fn phase_desig(letters: &str) -> Option<u8> {
    match letters {
        "C" | "T" => Some(1),
        "B" | "S" => Some(2),
        "BC" | "ST" => Some(3),
        "A" | "R" => Some(4),
        "AC" | "RT" => Some(5),
        "AB" | "RS" => Some(6),
        "ABC" | "RST" => Some(7),
        _ => None,
    }
}

/// Phase designation from the exporter's integer phase column.
pub fn phase_desig_code(code: i64) -> Option<u8> {
    match code {
        3 => Some(1),
        2 => Some(2),
        6 => Some(3),
        1 => Some(4),
        5 => Some(5),
        4 => Some(6),
        0 | 7 => Some(7),
        _ => None,
    }
}

/// Number of energized phases named by phase letters.
pub fn phase_count(letters: &str) -> Option<usize> {
    phase_desig(letters).map(|_| letters.len())
}

/// Phase letters of a library token, without the trailing conductor
/// count (`ABC3` gives `ABC`).
pub fn strip_conductor_count(token: &str) -> &str {
    token.trim_end_matches(|c: char| c.is_ascii_digit())
}

// Line-to-line kV and the matching code. The first match wins for
// repeated voltages (0.48 kV is always 40).
const NOMINAL_VOLTAGES: [(f64, u16); 18] = [
    (0.208, 20),
    (0.24, 30),
    (0.44, 35),
    (0.48, 40),
    (0.48, 50),
    (0.48, 60),
    (0.416, 70),
    (2.40, 80),
    (4.16, 110),
    (4.16, 120),
    (7.20, 150),
    (7.20, 160),
    (12.5, 210),
    (13.2, 230),
    (13.8, 260),
    (13.8, 270),
    (24.9, 340),
    (34.5, 380),
];

/// Nominal voltage code for a line-to-line voltage in kV.
pub fn nom_volt(kv_ll: f64) -> Option<u16> {
    NOMINAL_VOLTAGES
        .iter()
        .find(|(kv, _)| (kv - kv_ll).abs() < 1e-9)
        .map(|&(_, code)| code)
}

/// Standard insulation voltage class (kV) of underground MV cables.
pub fn insul_volt(kv_ll: f64) -> &'static str {
    if kv_ll <= 15.0 {
        "15"
    } else if kv_ll <= 25.0 {
        "25"
    } else if kv_ll <= 35.0 {
        "35"
    } else {
        "45"
    }
}

/// Service connection of loads and public lights.
pub fn service(code: i64) -> Option<u16> {
    match code {
        1 => Some(1),
        2 => Some(2),
        3 => Some(3),
        4 => Some(12),
        5 => Some(13),
        6 => Some(23),
        0 | 7 => Some(123),
        _ => None,
    }
}

pub fn tx_type(code: &str) -> Option<&'static str> {
    match code {
        "1" => Some("Tipo poste"),
        "2" => Some("Pedestal"),
        "3" => Some("Sumergible"),
        "4" => Some("Subestacion"),
        "5" => Some("Seco"),
        _ => None,
    }
}

/// Normally closed flag from the exporter's `IsActive` column.
pub fn normally_closed(is_active: &str) -> &'static str {
    if is_active.trim() == "1" {
        "Yes"
    } else {
        "No"
    }
}

/// Regulator PT ratio for a nominal line-to-line kV and a regulated
/// secondary voltage.
pub fn pt_ratio(kv_ll: f64, vreg: f64) -> f64 {
    (kv_ll * 1e3 / f64::sqrt(3.0) / vreg).round()
}

/// Customer class. Social tariffs have no class in the manual.
pub fn customer_class(code: &str) -> Option<&'static str> {
    match code.trim() {
        "1" => Some("R"),
        "2" | "22" | "23" => Some("C"),
        "3" | "32" | "33" | "80" | "85" | "15" | "13" | "14" => Some("I"),
        _ => None,
    }
}

const NO_DATA: [&str; 4] = ["NE", "NT", "UNK", "NA"];

const MATERIAL: [(&str, &str); 4] = [
    ("CO_SO", "SCU"),
    ("CO_TR", "BCU"),
    ("COBRE", "CU"),
    ("ALUMI", "AL"),
];

const INSULVOLT: [(&str, &str); 3] = [("600", "0.6"), ("1000", "1.0"), ("2000", "2.0")];

const INSULMAT: [(&str, &str); 3] = [("DESNU", "BARE"), ("SEMIA", "COVER"), ("AISLA", "INSUL")];

/// Rewrites a line library type into the manual's labels.
pub fn relabel_line_library(library: &str) -> String {
    let mut s = library.to_string();
    for token in NO_DATA {
        s = s.replace(token, "None");
    }
    for (from, to) in MATERIAL.iter().chain(&INSULVOLT).chain(&INSULMAT) {
        s = s.replace(from, to);
    }
    s
}

const TX_VOLTAGES: [(&str, &str); 3] = [(".240", "0.24"), (".208", "0.208"), (".480", "0.48")];

const TX_CONNECTIONS: [(&str, &str); 4] = [
    ("Estrella", "Y"),
    ("Delta", "D"),
    ("DEFINIR", "LG"),
    ("Fase_Partida", "SP"),
];

/// Rewrites a transformer library type into the manual's labels. Split
/// phase secondaries of three phase units become four wire deltas.
pub fn relabel_tx_library(library: &str) -> String {
    let mut s = library.to_string();
    for (from, to) in TX_VOLTAGES.iter().chain(&TX_CONNECTIONS) {
        s = s.replace(from, to);
    }
    if s.contains("ABC") {
        s = s.replace("SP", "4D");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_desig() {
        assert_eq!(phase_desig("RST"), Some(7));
        assert_eq!(phase_desig("ABC"), Some(7));
        assert_eq!(phase_desig("ST"), Some(3));
        assert_eq!(phase_desig("X"), None);
        assert_eq!(phase_desig_code(0), Some(7));
        assert_eq!(phase_desig_code(4), Some(6));
        assert_eq!(phase_desig_code(9), None);
        assert_eq!(phase_count("RT"), Some(2));
    }

    #[test]
    fn test_strip_conductor_count() {
        assert_eq!(strip_conductor_count("ABC3"), "ABC");
        assert_eq!(strip_conductor_count("A12"), "A");
        assert_eq!(strip_conductor_count("BC"), "BC");
        assert_eq!(strip_conductor_count("2"), "");
    }

    #[test]
    fn test_nom_volt() {
        assert_eq!(nom_volt(34.5), Some(380));
        assert_eq!(nom_volt(0.48), Some(40));
        assert_eq!(nom_volt(13.8), Some(260));
        assert_eq!(nom_volt(11.0), None);
    }

    #[test]
    fn test_service_and_class() {
        assert_eq!(service(6), Some(23));
        assert_eq!(service(7), Some(123));
        assert_eq!(customer_class("22"), Some("C"));
        assert_eq!(customer_class("41"), None);
    }

    #[test]
    fn test_pt_ratio() {
        assert_eq!(pt_ratio(34.5, 120.0), 166.0);
    }

    #[test]
    fn test_relabel_line_library() {
        assert_eq!(
            relabel_line_library("AER_BT_1/0 ALUMI_COBRE_2_3 DESNU_NE"),
            "AER_BT_1/0 AL_CU_2_3 BARE_None"
        );
        assert_eq!(relabel_line_library("CO_SO 600"), "SCU 0.6");
    }

    #[test]
    fn test_relabel_tx_library() {
        assert_eq!(
            relabel_tx_library("ABC_75_34.5_kV_.240_kV_1_Estrella_Fase_Partida"),
            "ABC_75_34.5_kV_0.24_kV_1_Y_4D"
        );
        assert_eq!(
            relabel_tx_library("A_25_34.5_kV_.240_kV_1_DEFINIR_Fase_Partida"),
            "A_25_34.5_kV_0.24_kV_1_LG_SP"
        );
    }
}
