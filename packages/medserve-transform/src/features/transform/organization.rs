//! Organization records built from package manufacturer data

use std::sync::Arc;

use super::engine::TransformEngine;
use crate::features::records::{
    ContactPoint, ContactSystem, HistoricalExtension, OrganizationRecord, Record, RecordBase,
    RecordBody, RecordKey,
};
use crate::features::references::Reference;
use crate::shared::models::{CodeableConcept, Manufacturer, Narrative, Status};

impl<'g> TransformEngine<'g> {
    /// Reference to the organization record of a manufacturer, creating the
    /// record on first use. Keyed by manufacturer code.
    pub fn ensure_organization(&mut self, manufacturer: &Manufacturer) -> Arc<Reference> {
        let reference = self.references.organization_reference(manufacturer);
        if !self
            .created
            .insert(RecordKey::Organization(manufacturer.code.clone()))
        {
            return reference;
        }

        let mut telecom = vec![ContactPoint::work(
            ContactSystem::Phone,
            manufacturer.phone.as_str(),
        )];
        if let Some(fax) = &manufacturer.fax {
            telecom.push(ContactPoint::work(ContactSystem::Fax, fax.as_str()));
        }

        let base = RecordBase {
            id: manufacturer.code.clone(),
            narrative: Narrative::generated(&manufacturer.name),
            source: self.source_code_system(),
            status: Status::Active,
            last_modified: None,
            code: CodeableConcept::default(),
            history: HistoricalExtension::default(),
            generalized: Vec::new(),
        };

        self.emit(Record {
            base,
            body: RecordBody::Organization(OrganizationRecord {
                name: manufacturer.name.clone(),
                address: vec![manufacturer.address.clone()],
                telecom,
            }),
        });
        reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;
    use crate::features::concept_graph::ConceptGraphBuilder;
    use crate::shared::models::ReleaseVersion;

    fn manufacturer(fax: Option<&str>) -> Manufacturer {
        Manufacturer {
            code: "AP".to_string(),
            name: "Apotex Pty Ltd".to_string(),
            address: "16 Giffnock Avenue, Macquarie Park NSW 2113".to_string(),
            phone: "1800 195 055".to_string(),
            fax: fax.map(str::to_string),
        }
    }

    #[test]
    fn test_organization_created_once() {
        let graph = ConceptGraphBuilder::new().build().unwrap();
        let release = ReleaseVersion::from_file_name(
            "NCTS_SCT_RF2_DISTRIBUTION_32506021000036107-20240331-SNAPSHOT.zip",
        )
        .unwrap();
        let mut engine = TransformEngine::new(&graph, release, &TransformConfig::default());

        let first = engine.ensure_organization(&manufacturer(Some("02 9878 0355")));
        let second = engine.ensure_organization(&manufacturer(None));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.reference, "Organization/AP");

        let batch = engine.take_batch();
        assert_eq!(batch.len(), 1);
        let organization = batch[0].as_organization().unwrap();
        assert_eq!(organization.name, "Apotex Pty Ltd");
        assert_eq!(organization.telecom.len(), 2);
        assert_eq!(organization.telecom[1].system, ContactSystem::Fax);
        assert_eq!(batch[0].base.narrative.div, "<div><p>Apotex Pty Ltd</p></div>");
    }

    #[test]
    fn test_organization_without_fax() {
        let graph = ConceptGraphBuilder::new().build().unwrap();
        let release = ReleaseVersion::from_file_name(
            "NCTS_SCT_RF2_DISTRIBUTION_32506021000036107-20240331-SNAPSHOT.zip",
        )
        .unwrap();
        let mut engine = TransformEngine::new(&graph, release, &TransformConfig::default());

        engine.ensure_organization(&manufacturer(None));
        let batch = engine.take_batch();
        let organization = batch[0].as_organization().unwrap();
        assert_eq!(organization.telecom.len(), 1);
        assert_eq!(organization.telecom[0].value, "1800 195 055");
    }
}
