//! Profile page: saved delivery addresses.

use clap::{Args, Subcommand};
use portos_core::{AddressPatch, Id, NewAddress};

use crate::app::App;
use crate::error::CliResult;
use crate::render;

#[derive(Debug, Clone, Subcommand)]
pub enum AddressAction {
    /// List saved addresses
    List,
    /// Save a new address
    Add(NewAddressArgs),
    /// Change some fields of an address
    Update {
        id: Id,
        #[command(flatten)]
        fields: AddressPatchArgs,
    },
    /// Delete an address
    Delete { id: Id },
    /// Make an address the default
    Default { id: Id },
}

#[derive(Debug, Clone, Args)]
pub struct NewAddressArgs {
    /// Recipient name
    #[arg(long)]
    pub name: String,
    /// Street address
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub state: String,
    /// Six digits
    #[arg(long)]
    pub pincode: String,
    /// Ten digits
    #[arg(long)]
    pub phone: String,
    /// Use as the default delivery address
    #[arg(long = "default")]
    pub make_default: bool,
}

impl From<NewAddressArgs> for NewAddress {
    fn from(args: NewAddressArgs) -> Self {
        NewAddress {
            name: args.name,
            address: args.street,
            city: args.city,
            state: args.state,
            pincode: args.pincode,
            phone: args.phone,
            is_default: args.make_default,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AddressPatchArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub pincode: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long = "default")]
    pub make_default: bool,
}

impl From<AddressPatchArgs> for AddressPatch {
    fn from(args: AddressPatchArgs) -> Self {
        AddressPatch {
            name: args.name,
            address: args.street,
            city: args.city,
            state: args.state,
            pincode: args.pincode,
            phone: args.phone,
            is_default: args.make_default.then_some(true),
        }
    }
}

pub async fn run(app: &App, action: AddressAction) -> CliResult<()> {
    match action {
        AddressAction::List => {
            let result = app.client.addresses().await;
            app.out.emit(result, |list| render::addresses(list))
        }
        AddressAction::Add(args) => {
            let result = app.client.add_address(&args.into()).await;
            app.out.emit(result, |created| match created {
                Some(address) => println!("Saved address {}", address.id),
                None => println!("Address saved"),
            })
        }
        AddressAction::Update { id, fields } => {
            let result = app.client.update_address(id, &fields.into()).await;
            app.out.emit(result, |()| println!("Address {id} updated"))
        }
        AddressAction::Delete { id } => {
            let result = app.client.delete_address(id).await;
            app.out.emit(result, |()| println!("Address {id} deleted"))
        }
        AddressAction::Default { id } => {
            let result = app.client.set_default_address(id).await;
            app.out
                .emit(result, |()| println!("Address {id} is now your default"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_args_only_set_given_fields() {
        let patch: AddressPatch = AddressPatchArgs {
            name: None,
            street: None,
            city: Some("Pune".into()),
            state: None,
            pincode: None,
            phone: None,
            make_default: false,
        }
        .into();
        assert_eq!(patch.city.as_deref(), Some("Pune"));
        assert_eq!(patch.is_default, None);
        assert!(!patch.is_empty());
    }
}
