use std::collections::HashSet;

use crate::error::RepositoryError;
use crate::types::{BuildingCompany, Development, NewDevelopment, NewUnit, Unit};

use super::DevelopmentRepository;

/// A [`DevelopmentRepository`] that keeps records in vectors.
///
/// Identifiers are assigned sequentially from 1, separately for developments and units.
/// Like the relational schema it stands in for, it rejects blank names and postal codes, and
/// units whose parent does not exist. A development submitted without a building-company id is
/// attached to the company named by its `company_name`, which is created on first use. [`Self::with_unique_name_and_postal_code`] additionally
/// rejects a second development with the same `(name, postal_code)`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    developments: Vec<Development>,
    units: Vec<Unit>,
    companies: Vec<BuildingCompany>,
    unique_keys: Option<HashSet<(String, String)>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce uniqueness of `(name, postal_code)` across stored developments.
    pub fn with_unique_name_and_postal_code(mut self) -> Self {
        let keys = self
            .developments
            .iter()
            .map(|d| (d.name.clone(), d.postal_code.clone()))
            .collect();
        self.unique_keys = Some(keys);
        self
    }

    pub fn developments(&self) -> &[Development] {
        &self.developments
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn building_companies(&self) -> &[BuildingCompany] {
        &self.companies
    }

    /// Id of the company called `name`, creating it if needed.
    pub fn find_or_create_building_company(&mut self, name: &str) -> i64 {
        if let Some(company) = self.companies.iter().find(|c| c.name == name) {
            return company.id;
        }
        let company = BuildingCompany {
            id: Self::next_id(self.companies.len()),
            name: name.to_string(),
        };
        let id = company.id;
        self.companies.push(company);
        id
    }

    /// Units stored under `development_id`, in insertion order.
    pub fn units_of(&self, development_id: i64) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(move |u| u.development_id == development_id)
    }

    fn next_id(len: usize) -> i64 {
        i64::try_from(len).map_or(i64::MAX, |n| n + 1)
    }
}

impl DevelopmentRepository for InMemoryRepository {
    fn create_development(&mut self, new: &NewDevelopment) -> Result<Development, RepositoryError> {
        if new.name.trim().is_empty() {
            return Err(RepositoryError::Constraint("development name is required".to_string()));
        }
        if new.postal_code.trim().is_empty() {
            return Err(RepositoryError::Constraint("postal code is required".to_string()));
        }
        if let Some(keys) = self.unique_keys.as_mut() {
            let key = (new.name.clone(), new.postal_code.clone());
            if !keys.insert(key) {
                return Err(RepositoryError::Constraint(format!(
                    "development '{}' with postal code {} already exists",
                    new.name, new.postal_code
                )));
            }
        }

        let mut development = Development::from_new(Self::next_id(self.developments.len()), new);
        if development.building_company_id.is_none() && !new.company_name.trim().is_empty() {
            development.building_company_id = Some(self.find_or_create_building_company(&new.company_name));
        }
        self.developments.push(development.clone());
        Ok(development)
    }

    fn create_unit(&mut self, new: &NewUnit) -> Result<Unit, RepositoryError> {
        if !self.developments.iter().any(|d| d.id == new.development_id) {
            return Err(RepositoryError::NotFound(format!(
                "development {}",
                new.development_id
            )));
        }
        if new.number.trim().is_empty() {
            return Err(RepositoryError::Constraint("unit number is required".to_string()));
        }

        let unit = Unit::from_new(Self::next_id(self.units.len()), new);
        self.units.push(unit.clone());
        Ok(unit)
    }
}
