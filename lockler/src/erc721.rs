//! ERC-721 contract interface descriptor.
//!
//! Human-readable signatures of the standard non-fungible-token interface,
//! consumed verbatim by contract-interaction code. Nothing in this crate calls
//! the contract.

/// Version of [`ERC721_ABI`]. Bump when the signature list changes.
pub const ERC721_ABI_VERSION: u32 = 1;

/// Human-readable ERC-721 function and event signatures.
pub const ERC721_ABI: &[&str] = &[
    "function balanceOf(address owner) view returns (uint256)",
    "function ownerOf(uint256 tokenId) view returns (address)",
    "function safeTransferFrom(address from, address to, uint256 tokenId, bytes data)",
    "function safeTransferFrom(address from, address to, uint256 tokenId)",
    "function transferFrom(address from, address to, uint256 tokenId)",
    "function approve(address to, uint256 tokenId)",
    "function setApprovalForAll(address operator, bool approved)",
    "function getApproved(uint256 tokenId) view returns (address)",
    "function isApprovedForAll(address owner, address operator) view returns (bool)",
    "event Transfer(address indexed from, address indexed to, uint256 indexed tokenId)",
    "event Approval(address indexed owner, address indexed approved, uint256 indexed tokenId)",
    "event ApprovalForAll(address indexed owner, address indexed operator, bool approved)",
];

/// Returns the signatures of the given kind (`"function"` or `"event"`).
pub fn signatures_of_kind(kind: &str) -> impl Iterator<Item = &'static str> + '_ {
    ERC721_ABI
        .iter()
        .copied()
        .filter(move |sig| sig.split_once(' ').is_some_and(|(k, _)| k == kind))
}
