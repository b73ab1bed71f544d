//! Concept graph fixtures
//!
//! Small hand-built releases exercising one engine behavior each. Every
//! fixture is built on top of the AMT scaffolding roots.

use chrono::NaiveDate;

use medserve_transform::shared::models::{
    AmtConcept, AttributeType, Concept, ConceptId, Manufacturer, MedicationKind, Relationship,
    Subsidy,
};
use medserve_transform::{ConceptGraph, ConceptGraphBuilder, ReleaseVersion};

pub const RELEASE_FILE: &str = "NCTS_SCT_RF2_DISTRIBUTION_32506021000036107-20240331-SNAPSHOT.zip";

// Units and forms shared by the fixtures
pub const MG: ConceptId = 700;
pub const EACH: ConceptId = 701;
pub const TABLET: ConceptId = 702;
pub const BLISTER: ConceptId = 703;

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
}

pub fn release() -> ReleaseVersion {
    ReleaseVersion::from_file_name(RELEASE_FILE).unwrap()
}

/// Builder with scaffolding, units and forms
pub fn base_builder() -> ConceptGraphBuilder {
    let mut builder = ConceptGraphBuilder::new().with_amt_scaffolding(date());
    builder
        .add_concept(Concept::new(MG, "mg", date()))
        .add_concept(Concept::new(EACH, "each", date()))
        .add_concept(Concept::new(TABLET, "tablet", date()))
        .add_concept(Concept::new(BLISTER, "blister pack", date()));
    builder
}

pub fn medication(
    id: ConceptId,
    term: &str,
    kind: MedicationKind,
    parents: impl IntoIterator<Item = ConceptId>,
) -> Concept {
    Concept::new(id, term, date())
        .with_kind(kind)
        .with_parent(kind.level().id())
        .with_parents(parents)
}

pub fn apotex() -> Manufacturer {
    Manufacturer {
        code: "AF".to_string(),
        name: "Apotex Pty Ltd".to_string(),
        address: "16 Giffnock Avenue, Macquarie Park NSW 2113".to_string(),
        phone: "1800 195 055".to_string(),
        fax: Some("02 8877 0099".to_string()),
    }
}

// ═══════════════════════════════════════════════════════════════
// Paracetamol release: one concept per level
// ═══════════════════════════════════════════════════════════════

pub mod paracetamol {
    use super::ConceptId;

    pub const S1: ConceptId = 1001;
    pub const M1: ConceptId = 1002;
    pub const U1: ConceptId = 1003;
    pub const T1: ConceptId = 1004;
    pub const P1: ConceptId = 1005;
    pub const TP1: ConceptId = 1006;
    pub const C1: ConceptId = 1007;

    /// Trade product "Panadol", child of the TP root
    pub const PANADOL: ConceptId = 1900;

    /// Top-level concepts of the release, in no particular order
    pub const MEDICATIONS: [ConceptId; 7] = [S1, M1, U1, T1, P1, TP1, C1];
}

/// Substance S1, base product M1 (S1 500 mg), unit of use U1 and branded
/// unit of use T1 over it, unbranded package P1 of M1, branded package TP1
/// of T1 under P1 and the containered package C1 holding TP1
pub fn paracetamol_builder() -> ConceptGraphBuilder {
    paracetamol_release(false)
}

/// Paracetamol release where T1 and TP1 are also is-a the trade product
/// PANADOL, as branded AMT concepts are
pub fn trade_product_paracetamol_graph() -> ConceptGraph {
    paracetamol_release(true).build().unwrap()
}

fn paracetamol_release(with_trade_product: bool) -> ConceptGraphBuilder {
    use paracetamol::*;

    let mut t1_parents = vec![U1];
    let mut tp1_parents = vec![P1];
    let mut builder = base_builder();
    if with_trade_product {
        builder.add_concept(Concept::new(PANADOL, "Panadol", date()).with_parent(AmtConcept::Tp.id()));
        t1_parents.push(PANADOL);
        tp1_parents.push(PANADOL);
    }

    builder
        .add_concept(medication(S1, "paracetamol", MedicationKind::Substance, []))
        .add_concept(medication(
            M1,
            "paracetamol",
            MedicationKind::UnbrandedProduct,
            [],
        ))
        .add_concept(medication(
            U1,
            "paracetamol 500 mg tablet",
            MedicationKind::UnbrandedProductStrengthForm,
            [M1],
        ))
        .add_concept(
            medication(
                T1,
                "Panadol 500 mg tablet",
                MedicationKind::BrandedProductStrengthForm,
                t1_parents,
            )
            .with_brand("Panadol"),
        )
        .add_concept(medication(
            P1,
            "paracetamol 500 mg tablet, 1",
            MedicationKind::UnbrandedPackage,
            [],
        ))
        .add_concept(
            medication(
                TP1,
                "Panadol 500 mg tablet, 1",
                MedicationKind::BrandedPackage,
                tp1_parents,
            )
            .with_brand("Panadol"),
        )
        .add_concept(
            medication(
                C1,
                "Panadol 500 mg tablet, 1, blister pack",
                MedicationKind::BrandedPackageContainer,
                [TP1],
            )
            .with_brand("Panadol"),
        )
        .add_relationship(
            Relationship::new(M1, AttributeType::HasIntendedActiveIngredient, S1).in_group(1),
        )
        .add_relationship(
            Relationship::new(M1, AttributeType::HasAustralianBoss, S1)
                .in_group(1)
                .with_value(500.0, MG),
        )
        .add_relationship(Relationship::new(U1, AttributeType::HasManufacturedDoseForm, TABLET))
        .add_relationship(Relationship::new(P1, AttributeType::HasMpuu, M1).with_value(1.0, EACH))
        .add_relationship(Relationship::new(TP1, AttributeType::HasTpuu, T1).with_value(1.0, EACH))
        .add_relationship(
            Relationship::new(C1, AttributeType::HasSubpack, TP1).with_value(1.0, EACH),
        )
        .add_relationship(Relationship::new(C1, AttributeType::HasContainerType, BLISTER));
    builder
}

pub fn paracetamol_graph() -> ConceptGraph {
    paracetamol_builder().build().unwrap()
}

/// Paracetamol release with subsidies on TP1 and C1 and a manufacturer on C1
pub fn subsidised_paracetamol_graph() -> ConceptGraph {
    use paracetamol::*;

    let mut builder = paracetamol_builder();
    builder
        .attach_subsidy(
            TP1,
            Subsidy::new("1234K", "GE")
                .with_prices(3.12, 3.12)
                .with_classification("N02BE01", "paracetamol"),
        )
        .attach_subsidy(
            TP1,
            Subsidy::new("5678L", "HS")
                .with_restriction("A")
                .with_classification("N02BE01", "paracetamol"),
        )
        .attach_subsidy(
            C1,
            Subsidy::new("1234K", "GE")
                .with_prices(9.99, 9.99)
                .with_classification("N02BE51", "paracetamol, combinations excl. psycholeptics"),
        )
        .attach_manufacturer(C1, apotex());
    builder.build().unwrap()
}

// ═══════════════════════════════════════════════════════════════
// Generalization: a CTPP whose ancestors cover every level
// ═══════════════════════════════════════════════════════════════

pub mod generalization {
    use super::ConceptId;

    pub const X: ConceptId = 2001;
    pub const L1: ConceptId = 2002;
    pub const L2: ConceptId = 2003;
    pub const L3: ConceptId = 2004;
    pub const L4: ConceptId = 2005;
}

/// X (CTPP) → L1 (TPP) → L2 (MPP, also under the TPUU root) → L3 (MPUU) → L4 (MP)
pub fn generalization_graph() -> ConceptGraph {
    use generalization::*;

    let mut builder = base_builder();
    builder
        .add_concept(medication(L4, "amoxicillin", MedicationKind::UnbrandedProduct, []))
        .add_concept(medication(
            L3,
            "amoxicillin 500 mg capsule",
            MedicationKind::UnbrandedProductStrengthForm,
            [L4],
        ))
        .add_concept(medication(
            L2,
            "amoxicillin 500 mg capsule, 20",
            MedicationKind::UnbrandedPackage,
            [AmtConcept::Tpuu.id(), L3],
        ))
        .add_concept(medication(
            L1,
            "Amoxil 500 mg capsule, 20",
            MedicationKind::BrandedPackage,
            [L2],
        ))
        .add_concept(medication(
            X,
            "Amoxil 500 mg capsule, 20, blister pack",
            MedicationKind::BrandedPackageContainer,
            [L1],
        ));
    builder.build().unwrap()
}

// ═══════════════════════════════════════════════════════════════
// Back-stitch: subpack relationships stated on a TPP
// ═══════════════════════════════════════════════════════════════

pub mod back_stitch {
    use super::ConceptId;

    pub const MPP_SUB: ConceptId = 3001;
    pub const MPP_OUTER: ConceptId = 3002;
    pub const TPP_SUB: ConceptId = 3003;
    pub const TPP_OUTER: ConceptId = 3004;
    pub const CTPP_SUB: ConceptId = 3005;
    pub const CTPP_OUTER: ConceptId = 3006;
    pub const TPP_SUB2: ConceptId = 3007;
    pub const CTPP_SUB2: ConceptId = 3008;
    pub const CTPP_OUTER2: ConceptId = 3009;
}

/// Unbranded and branded packs only: TPP_OUTER states a subpack pointing at
/// the unbranded MPP_SUB and no containered package restates it
fn back_stitch_packs() -> ConceptGraphBuilder {
    use back_stitch::*;

    let mut builder = base_builder();
    builder
        .add_concept(medication(
            MPP_SUB,
            "ethinyloestradiol 30 mcg tablet, 21",
            MedicationKind::UnbrandedPackage,
            [],
        ))
        .add_concept(medication(
            MPP_OUTER,
            "ethinyloestradiol 30 mcg tablet, 3 x 21",
            MedicationKind::UnbrandedPackage,
            [],
        ))
        .add_concept(medication(
            TPP_SUB,
            "Microgynon 30 tablet, 21",
            MedicationKind::BrandedPackage,
            [MPP_SUB],
        ))
        .add_concept(medication(
            TPP_OUTER,
            "Microgynon 30 tablet, 3 x 21",
            MedicationKind::BrandedPackage,
            [MPP_OUTER],
        ))
        .add_relationship(
            Relationship::new(MPP_OUTER, AttributeType::HasSubpack, MPP_SUB).with_value(3.0, EACH),
        )
        .add_relationship(
            Relationship::new(TPP_OUTER, AttributeType::HasSubpack, MPP_SUB).with_value(3.0, EACH),
        );
    builder
}

pub fn unresolvable_back_stitch_graph() -> ConceptGraph {
    back_stitch_packs().build().unwrap()
}

/// Containered packages on top: CTPP_OUTER restates the subpack against
/// CTPP_SUB, a child of TPP_SUB
pub fn back_stitch_builder() -> ConceptGraphBuilder {
    use back_stitch::*;

    let mut builder = back_stitch_packs();
    builder
        .add_concept(medication(
            CTPP_SUB,
            "Microgynon 30 tablet, 21, blister pack",
            MedicationKind::BrandedPackageContainer,
            [TPP_SUB],
        ))
        .add_concept(medication(
            CTPP_OUTER,
            "Microgynon 30 tablet, 3 x 21, blister packs",
            MedicationKind::BrandedPackageContainer,
            [TPP_OUTER],
        ))
        .add_relationship(
            Relationship::new(CTPP_OUTER, AttributeType::HasSubpack, CTPP_SUB)
                .with_value(3.0, EACH),
        );
    builder
}

pub fn back_stitch_graph() -> ConceptGraph {
    back_stitch_builder().build().unwrap()
}

/// Adds a second branded pack under MPP_SUB reached through another
/// containered package of TPP_OUTER
pub fn ambiguous_back_stitch_graph() -> ConceptGraph {
    use back_stitch::*;

    let mut builder = back_stitch_builder();
    builder
        .add_concept(medication(
            TPP_SUB2,
            "Levlen ED tablet, 21",
            MedicationKind::BrandedPackage,
            [MPP_SUB],
        ))
        .add_concept(medication(
            CTPP_SUB2,
            "Levlen ED tablet, 21, blister pack",
            MedicationKind::BrandedPackageContainer,
            [TPP_SUB2],
        ))
        .add_concept(medication(
            CTPP_OUTER2,
            "Microgynon 30 tablet, 3 x 21, wallet",
            MedicationKind::BrandedPackageContainer,
            [TPP_OUTER],
        ))
        .add_relationship(
            Relationship::new(CTPP_OUTER2, AttributeType::HasSubpack, CTPP_SUB2)
                .with_value(3.0, EACH),
        );
    builder.build().unwrap()
}

// ═══════════════════════════════════════════════════════════════
// Diamond: a branded unit of use over two unbranded ones sharing an MP
// ═══════════════════════════════════════════════════════════════

pub mod diamond {
    use super::ConceptId;

    pub const MP: ConceptId = 4001;
    pub const MPUU_A: ConceptId = 4002;
    pub const MPUU_B: ConceptId = 4003;
    pub const TPUU: ConceptId = 4004;
}

/// TPUU → {MPUU_A, MPUU_B} → MP
pub fn diamond_graph() -> ConceptGraph {
    use diamond::*;

    let mut builder = base_builder();
    builder
        .add_concept(medication(MP, "metformin", MedicationKind::UnbrandedProduct, []))
        .add_concept(medication(
            MPUU_A,
            "metformin 500 mg tablet",
            MedicationKind::UnbrandedProductStrengthForm,
            [MP],
        ))
        .add_concept(medication(
            MPUU_B,
            "metformin 500 mg film-coated tablet",
            MedicationKind::UnbrandedProductStrengthForm,
            [MP],
        ))
        .add_concept(medication(
            TPUU,
            "Diabex 500 mg tablet",
            MedicationKind::BrandedProductStrengthForm,
            [MPUU_A, MPUU_B],
        ));
    builder.build().unwrap()
}
