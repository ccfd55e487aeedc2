//! ERC-721 bindings and read helper.
//!
//! [`IERC721`] mirrors [`lockler::erc721::ERC721_ABI`]. [`Erc721Reader`] only
//! issues view calls through a resolved provider; it never sends transactions.

use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_sol_types::sol;

sol! {
    /// Standard ERC-721 non-fungible token interface.
    ///
    /// Reference: <https://eips.ethereum.org/EIPS/eip-721>
    #[allow(missing_docs)]
    #[derive(Debug)]
    #[sol(rpc)]
    interface IERC721 {
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
        event Approval(address indexed owner, address indexed approved, uint256 indexed tokenId);
        event ApprovalForAll(address indexed owner, address indexed operator, bool approved);

        function balanceOf(address owner) external view returns (uint256);
        function ownerOf(uint256 tokenId) external view returns (address);
        function safeTransferFrom(address from, address to, uint256 tokenId, bytes data) external;
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
        function transferFrom(address from, address to, uint256 tokenId) external;
        function approve(address to, uint256 tokenId) external;
        function setApprovalForAll(address operator, bool approved) external;
        function getApproved(uint256 tokenId) external view returns (address);
        function isApprovedForAll(address owner, address operator) external view returns (bool);
    }
}

/// Errors returned by [`Erc721Reader`].
#[derive(Debug, thiserror::Error)]
pub enum Erc721Error {
    /// The view call failed or returned undecodable data.
    #[error(transparent)]
    Contract(#[from] alloy_contract::Error),
}

/// Read-only access to one ERC-721 contract.
#[derive(Debug, Clone)]
pub struct Erc721Reader<P> {
    contract: IERC721::IERC721Instance<P>,
}

impl<P: Provider> Erc721Reader<P> {
    /// Creates a reader for the contract at `address`.
    pub fn new(address: Address, provider: P) -> Self {
        Self {
            contract: IERC721::new(address, provider),
        }
    }

    /// Returns the contract address.
    pub fn address(&self) -> &Address {
        self.contract.address()
    }

    /// Number of tokens held by `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`Erc721Error`] if the call fails.
    pub async fn balance_of(&self, owner: Address) -> Result<U256, Erc721Error> {
        Ok(self.contract.balanceOf(owner).call().await?)
    }

    /// Current owner of `token_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Erc721Error`] if the call fails (including for nonexistent tokens).
    pub async fn owner_of(&self, token_id: U256) -> Result<Address, Erc721Error> {
        Ok(self.contract.ownerOf(token_id).call().await?)
    }

    /// Whether `operator` may manage every token of `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`Erc721Error`] if the call fails.
    pub async fn is_approved_for_all(
        &self,
        owner: Address,
        operator: Address,
    ) -> Result<bool, Erc721Error> {
        Ok(self
            .contract
            .isApprovedForAll(owner, operator)
            .call()
            .await?)
    }
}
