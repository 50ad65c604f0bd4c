use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::catalog::{NewProductInput, StockView};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogRepository;

pub struct CatalogService<R> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_available(&self) -> Result<Vec<StockView>, DomainError> {
        self.repo.list_available()
    }

    pub fn add_product(
        &self,
        seller_id: Uuid,
        input: NewProductInput,
    ) -> Result<StockView, DomainError> {
        if input.name.trim().is_empty() {
            return Err(DomainError::Validation(
                "Product name is required".to_string(),
            ));
        }
        if input.price < BigDecimal::from(0) {
            return Err(DomainError::Validation(
                "Product price must be non-negative".to_string(),
            ));
        }
        if input.initial_stock.is_some_and(|amount| amount < 0) {
            return Err(DomainError::Validation(
                "Initial stock must be non-negative".to_string(),
            ));
        }
        self.repo.add_product(seller_id, input)
    }

    pub fn list_for_seller(&self, seller_id: Uuid) -> Result<Vec<StockView>, DomainError> {
        self.repo.list_for_seller(seller_id)
    }

    pub fn set_stock(
        &self,
        seller_id: Uuid,
        stock_id: Uuid,
        new_amount: i32,
    ) -> Result<StockView, DomainError> {
        if new_amount < 0 {
            return Err(DomainError::Validation(
                "Stock amount must be non-negative".to_string(),
            ));
        }
        self.repo.set_stock(seller_id, stock_id, new_amount)
    }

    pub fn set_price(
        &self,
        seller_id: Uuid,
        stock_id: Uuid,
        new_price: BigDecimal,
    ) -> Result<StockView, DomainError> {
        if new_price < BigDecimal::from(0) {
            return Err(DomainError::Validation(
                "Product price must be non-negative".to_string(),
            ));
        }
        self.repo.set_price(seller_id, stock_id, new_price)
    }

    pub fn remove_stock(&self, seller_id: Uuid, stock_id: Uuid) -> Result<(), DomainError> {
        self.repo.remove_stock(seller_id, stock_id)
    }
}
