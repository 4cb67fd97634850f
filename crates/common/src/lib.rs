/**
 * Signed considerations between minds.
 *  - Canonical encoding and content ids
 *  - Signing with a re-derived key, and verification
 */
pub mod consideration;
/**
 * Cryptographic types and operations.
 *  - Passphrase to mnemonic to key derivation
 *  - Public and private key implementations
 *  - Base64 identifiers
 */
pub mod crypto;
/**
 * Short renderings of identifiers and ids.
 */
pub mod display;
/**
 * Graph text reader and the builder that shapes
 *  it into renderable nodes and links.
 */
pub mod graph;
/**
 * Public-only state of an imported mind.
 */
pub mod session;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::consideration::{
        Consideration, ConsiderationError, ConsiderationId, ConsiderationSigner,
    };
    pub use crate::crypto::{Identifier, KeyError, KeyPair, PublicKey, SecretKey};
    pub use crate::graph::{Graph, GraphLink, GraphNode};
    pub use crate::session::{Session, SessionConfig};
    pub use crate::version::build_info;
}
