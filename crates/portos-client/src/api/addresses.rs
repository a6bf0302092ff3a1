use portos_core::validation::{validate_address, validate_address_patch};
use portos_core::{Address, AddressPatch, Id, NewAddress, ValidationError};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientResult;
use crate::http::{Access, Request, StorefrontClient};

const ADDRESSES_PATH: &str = "/protected/profile/addresses";

/// The list endpoint returns a bare array; some builds wrap it.
#[derive(Deserialize)]
#[serde(untagged)]
enum AddressList {
    Bare(Vec<Address>),
    Wrapped {
        #[serde(alias = "data")]
        addresses: Vec<Address>,
    },
}

/// Pulls the created address out of a create response: the bare echo, or an
/// object under `address` / `data`. A bare address has its own `address`
/// field holding the street, so only object values are unwrapped.
fn created_address(body: Value) -> Option<Address> {
    if let Ok(address) = Address::deserialize(&body) {
        return Some(address);
    }
    ["address", "data"]
        .iter()
        .filter_map(|key| body.get(key))
        .find(|v| v.is_object())
        .and_then(|v| Address::deserialize(v).ok())
}

impl StorefrontClient {
    pub async fn addresses(&self) -> ClientResult<Vec<Address>> {
        let request = Request::get(ADDRESSES_PATH, Access::Protected)
            .on_failure("Failed to fetch addresses");
        Ok(match self.execute::<AddressList>(request).await? {
            AddressList::Bare(addresses) | AddressList::Wrapped { addresses } => addresses,
        })
    }

    /// Saves a new address. Returns it when the server echoes it back.
    pub async fn add_address(&self, address: &NewAddress) -> ClientResult<Option<Address>> {
        validate_address(address)?;

        let request = Request::post(ADDRESSES_PATH, Access::Protected)
            .json(address)?
            .on_failure("Failed to add address");
        let body: Value = self.execute(request).await?;
        Ok(created_address(body))
    }

    pub async fn update_address(&self, address_id: Id, patch: &AddressPatch) -> ClientResult<()> {
        if patch.is_empty() {
            return Err(ValidationError::Required {
                field: "at least one address field".to_string(),
            }
            .into());
        }
        validate_address_patch(patch)?;

        let request = Request::put(format!("{ADDRESSES_PATH}/{address_id}"), Access::Protected)
            .json(patch)?
            .on_failure("Failed to update address")
            .on_not_found("Address not found");
        self.execute_ack(request).await
    }

    pub async fn delete_address(&self, address_id: Id) -> ClientResult<()> {
        let request = Request::delete(format!("{ADDRESSES_PATH}/{address_id}"), Access::Protected)
            .on_failure("Failed to delete address")
            .on_not_found("Address not found");
        self.execute_ack(request).await
    }

    pub async fn set_default_address(&self, address_id: Id) -> ClientResult<()> {
        let patch = AddressPatch {
            is_default: Some(true),
            ..AddressPatch::default()
        };
        self.update_address(address_id, &patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;
    use serde_json::json;

    fn home() -> NewAddress {
        NewAddress {
            name: "Asha".into(),
            address: "12 MG Road".into(),
            city: "Pune".into(),
            state: "MH".into(),
            pincode: "411001".into(),
            phone: "9876543210".into(),
            is_default: false,
        }
    }

    #[test]
    fn test_created_address_shapes() {
        let addr = json!({
            "id": 3, "name": "Asha", "address": "12 MG Road", "city": "Pune",
            "state": "MH", "pincode": "411001", "phone": "9876543210"
        });
        assert_eq!(created_address(addr.clone()).unwrap().id, 3);
        assert_eq!(created_address(json!({"address": addr.clone()})).unwrap().id, 3);
        assert_eq!(created_address(json!({"data": addr})).unwrap().id, 3);
        assert!(created_address(json!({"message": "created"})).is_none());
    }

    #[tokio::test]
    async fn test_addresses_accepts_alternate_fields() {
        let api = MockApi::start().await;
        api.respond(
            "GET",
            ADDRESSES_PATH,
            200,
            json!([{
                "id": 1, "name": "Asha", "address_line1": "12 MG Road", "city": "Pune",
                "state": "MH", "postal_code": 411001, "phone": 9876543210u64, "is_default": true
            }]),
        );
        let client = api.logged_in_client("tok").await;

        let list = client.addresses().await.unwrap();
        assert_eq!(list[0].pincode, "411001");
        assert_eq!(list[0].phone, "9876543210");
        assert!(list[0].is_default);
    }

    #[tokio::test]
    async fn test_add_address_validates() {
        let api = MockApi::start().await;
        api.respond("POST", ADDRESSES_PATH, 201, json!({"message": "created"}));
        let client = api.logged_in_client("tok").await;

        let mut bad = home();
        bad.pincode = "41100".into();
        let err = client.add_address(&bad).await.unwrap_err();
        assert_eq!(err.to_string(), "pincode has invalid format: must be exactly 6 digits");
        assert!(api.requests().is_empty());

        assert_eq!(client.add_address(&home()).await.unwrap(), None);
        assert_eq!(api.requests()[0].body["isDefault"], json!(false));
    }

    #[tokio::test]
    async fn test_add_address_returns_echoed_address() {
        let api = MockApi::start().await;
        api.respond(
            "POST",
            ADDRESSES_PATH,
            201,
            json!({
                "id": 3, "name": "Asha", "address": "12 MG Road", "city": "Pune",
                "state": "MH", "pincode": "411001", "phone": "9876543210", "isDefault": false
            }),
        );
        let client = api.logged_in_client("tok").await;

        let saved = client.add_address(&home()).await.unwrap().unwrap();
        assert_eq!(saved.id, 3);
        assert_eq!(saved.address, "12 MG Road");
    }

    #[test]
    fn test_created_address_ignores_non_object_wrappers() {
        assert!(created_address(json!({"address": "12 MG Road"})).is_none());
        assert!(created_address(json!({"data": null})).is_none());
    }

    #[tokio::test]
    async fn test_set_default_sends_only_flag() {
        let api = MockApi::start().await;
        api.respond("PUT", "/protected/profile/addresses/4", 200, json!({}));
        let client = api.logged_in_client("tok").await;

        client.set_default_address(4).await.unwrap();
        assert_eq!(api.requests()[0].body, json!({"isDefault": true}));

        let err = client
            .update_address(4, &AddressPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_client_side());
    }

    #[tokio::test]
    async fn test_delete_missing_address() {
        let api = MockApi::start().await;
        let client = api.logged_in_client("tok").await;
        let err = client.delete_address(9).await.unwrap_err();
        assert_eq!(err.to_string(), "Address not found");
    }
}
