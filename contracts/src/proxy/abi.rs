//! Solidity interfaces of the proxy contracts.
//!
//! Defined with `alloy_sol_macro::sol`, which enables both decoding incoming
//! calldata and constructing calldata for calls into a proxy.
pub use interfaces::*;

mod interfaces {
    #![allow(missing_docs)]
    #![cfg_attr(coverage_nightly, coverage(off))]

    use alloy_sol_macro::sol;

    sol! {
        /// Entry points an [`crate::proxy::admin::AdminUpgradeabilityProxy`]
        /// serves to its admin.
        interface IAdminUpgradeabilityProxy {
            function admin() external view returns (address);
            function implementation() external view returns (address);
            function upgradeTo(address newImplementation) external;
            function upgradeToAndCall(
                address newImplementation,
                bytes calldata data
            ) external payable;
            function changeAdmin(address newAdmin) external;
        }
    }
}
