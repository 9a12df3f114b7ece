//! A small feeder: a 34.5 kV overhead line split in two segments, one
//! single phase and one three phase transformer, and a low voltage
//! network with a service drop in parallel to an underground cable.

use crate::sheets::*;

fn bus(name: &str, un: f64, x: f64, y: f64) -> BusRow {
    BusRow {
        name: name.to_string(),
        un,
        coord_x1: x,
        coord_y1: y,
    }
}

fn line(name: &str, node1: &str, node2: &str, library: &str, length: f64, un: f64) -> LineRow {
    LineRow {
        node1: node1.to_string(),
        node2: node2.to_string(),
        name: name.to_string(),
        library_type: library.to_string(),
        length,
        un,
    }
}

fn transformer(name: &str, library: &str, un2: f64, sr: f64, x: f64, y: f64) -> TransformerRow {
    TransformerRow {
        name: name.to_string(),
        node1: "AREA_MT_2".to_string(),
        node2: name.to_string(),
        switch1: "1".to_string(),
        switch2: "1".to_string(),
        is_regulated: "0".to_string(),
        un1: 34.5,
        un2,
        sr,
        library_type: library.to_string(),
        coord_x1: x,
        coord_y1: y,
    }
}

#[allow(clippy::too_many_arguments)]
fn load(node1: &str, name: &str, phase: f64, un: f64, e: f64, x: f64, y: f64, tipo: &str) -> LoadRow {
    LoadRow {
        node1: node1.to_string(),
        name: name.to_string(),
        phase,
        switch1: "1".to_string(),
        un,
        e,
        cos_phi: 0.9,
        coord_x1: x,
        coord_y1: y,
        tipo: tipo.to_string(),
    }
}

pub(crate) fn workbook() -> Workbook {
    Workbook {
        buses: vec![
            bus("AREA_MT_1", 34.5, 0.0, 0.0),
            bus("AREA_MT_3", 34.5, 50.0, 0.0),
            bus("AREA_MT_2", 34.5, 100.0, 0.0),
            bus("AREA_BT_1", 0.24, 100.0, 50.0),
            bus("TX_1_T", 0.24, 100.0, 0.0005),
            bus("SUB_BT_1", 0.24, 150.0, 50.0),
        ],
        lines: vec![
            line(
                "L1__1",
                "AREA_MT_1",
                "AREA_MT_3",
                "AER_ABC3 1/0 ALUMI_ALUMI_2_AAAC_123.3_2.1B_Y",
                0.05,
                34.5,
            ),
            line(
                "L1__2",
                "AREA_MT_3",
                "AREA_MT_2",
                "AER_ABC3 1/0 ALUMI_ALUMI_2_AAAC_123.3_2.1B_Y",
                0.05,
                34.5,
            ),
            line(
                "L2",
                "AREA_BT_1",
                "SUB_BT_1",
                "SUB_BT_ABC3 _1/0 COBRE AISLA_2",
                0.0707,
                0.24,
            ),
            line("L3", "TX_1_T", "AREA_BT_1", "BT_1/0 ALUMI_ALUMI_2_1", 0.05, 0.24),
            line("L4", "AREA_BT_1", "SUB_BT_1", "BT_2 ALUMI_ALUMI_4_3", 0.0707, 0.24),
        ],
        asym_transformers: vec![transformer(
            "TX_1_T",
            "A_25_34.5_kV_.240_kV_1",
            0.24,
            25.0,
            100.0,
            0.0,
        )],
        transformers: vec![transformer(
            "TX_2_T",
            "ABC_75_34.5_kV_.480_kV_2_Estrella_Fase_Partida",
            0.48,
            75.0,
            0.0,
            200.0,
        )],
        loads: vec![
            load("AREA_BT_1", "CLI_1", 1.0, 0.24, 300.0, 100.0, 50.0, "1"),
            load("TX_1_T", "CLI_2", 4.0, 0.24, 120.0, 100.0, 0.0, "2"),
            load("AREA_MT_2", "CLI_3", 0.0, 34.5, 9000.0, 300.0, 300.0, "3"),
        ],
        fuses: vec![FuseRow {
            name: "F_1_F".to_string(),
            phase: 7.0,
            is_active: "1".to_string(),
            on_element: "L1__1".to_string(),
            x: 50.0,
            y: 0.0,
        }],
        regulators: vec![RegulatorRow {
            name: "REG_1_R".to_string(),
            node1: "AREA_MT_1".to_string(),
            node2: "AREA_MT_3".to_string(),
            un1: 34.5,
            phase: 0.0,
            library_type: "REG_333_kVA".to_string(),
            x: 25.0,
            y: 0.0,
        }],
        ders: vec![DerRow {
            name: "GD_BT_1_FV_PV".to_string(),
            node1: "AREA_BT_1".to_string(),
            switch1: "1".to_string(),
            sr: 5.0,
        }],
        reclosers: vec![RecloserRow {
            name: "REC_1R".to_string(),
            phase: 0.0,
            switch: "1".to_string(),
            x: 50.0,
            y: 0.0,
        }],
        public_lights: vec![PublicLightRow {
            node1: "AREA_BT_1".to_string(),
            name: "AP_1".to_string(),
            phase: 1.0,
            potencia_kw: 0.15,
            coord_x1: 100.0,
            coord_y1: 50.0,
            un: 0.24,
        }],
    }
}
