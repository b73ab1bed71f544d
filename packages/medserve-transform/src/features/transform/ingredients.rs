//! Ingredient and strength computation for product records

use super::engine::TransformEngine;
use crate::errors::{Result, TransformError};
use crate::features::records::Ingredient;
use crate::shared::models::{AttributeType, Concept, Quantity, Ratio, Relationship};

impl<'g> TransformEngine<'g> {
    /// Ingredient of one relationship group of `product`.
    ///
    /// The group must hold exactly one intended active ingredient. A basis of
    /// strength relationship in the same group adds the strength ratio and,
    /// when it names another substance, a separate basis-of-strength
    /// reference.
    pub(super) fn ingredient(
        &mut self,
        product: &'g Concept,
        group: &[&'g Relationship],
    ) -> Result<Ingredient> {
        let graph = self.graph;

        let active: Vec<&Relationship> = group
            .iter()
            .copied()
            .filter(|r| r.kind == AttributeType::HasIntendedActiveIngredient)
            .collect();
        let active = match active.as_slice() {
            [single] => *single,
            others => {
                return Err(TransformError::model_inconsistency(format!(
                    "expected one intended active ingredient in relationship group of {}, found {}",
                    product,
                    others.len()
                ))
                .with_concept(product.id))
            }
        };

        let item = self.ensure_substance(graph.concept(active.destination)?)?;

        let basis = group
            .iter()
            .copied()
            .find(|r| r.kind == AttributeType::HasAustralianBoss);

        let (basis_of_strength, strength) = match basis {
            Some(basis) => {
                let basis_of_strength = if basis.destination != active.destination {
                    Some(self.ensure_substance(graph.concept(basis.destination)?)?)
                } else {
                    None
                };
                (basis_of_strength, Some(self.strength_ratio(product, basis)?))
            }
            None => (None, None),
        };

        Ok(Ingredient {
            item,
            basis_of_strength,
            strength,
        })
    }

    /// Strength of a basis of strength relationship.
    ///
    /// The value's unit is a composite unit (`mg/mL`): the numerator unit is
    /// its `has_numerator_units` destination and the denominator, with value
    /// 1, its `has_denominator_units` destination. A simple unit (`mg`) has
    /// neither and is the numerator unit itself.
    fn strength_ratio(&self, product: &Concept, basis: &Relationship) -> Result<Ratio> {
        let graph = self.graph;
        let datatype = basis.datatype.ok_or_else(|| {
            TransformError::model_inconsistency(format!(
                "basis of strength relationship on {} has no strength value",
                product
            ))
            .with_concept(product.id)
        })?;

        let unit = graph.concept(datatype.unit)?;
        let denominator_unit =
            graph.optional_single_destination(unit, AttributeType::HasDenominatorUnits)?;
        let numerator_unit =
            graph.optional_single_destination(unit, AttributeType::HasNumeratorUnits)?;

        let numerator_unit = match (numerator_unit, denominator_unit) {
            (Some(numerator), _) => numerator,
            (None, None) => unit,
            (None, Some(_)) => {
                return Err(TransformError::missing_unit(format!(
                    "unit {} of the strength of {} has a denominator but no numerator unit",
                    unit, product
                ))
                .with_concept(product.id))
            }
        };

        Ok(Ratio {
            numerator: Quantity::with_unit(datatype.value, numerator_unit),
            denominator: match denominator_unit {
                Some(denominator) => Quantity::with_unit(1.0, denominator),
                None => Quantity::unitless(1.0),
            },
        })
    }
}
