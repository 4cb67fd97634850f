//! Shared fixtures for the integration tests
#![allow(dead_code)]

use common::consideration::{Consideration, ConsiderationSigner};

pub const PASSPHRASE: &str = "correct horse";

pub const KEY_0: &str = "kAlAffNeTSfhooM0641keP9tI7GoGATYQpCtYmuZ7ew=";
pub const KEY_1: &str = "BxlVtQhjHVYGsA9bYomX35SMgwSVLc77G4qJpbRR0dI=";
pub const KEY_2: &str = "C3fn3liRBFC1iPRj6ORXkl5lY77+HliVcATSavbVi3w=";

pub const IDEAL: &str = "ideaL00000000000000000000000000000000000000=";

/// A consideration signed by key 0 with a fixed time and nonce
pub fn signed(memo: &str) -> Consideration {
    ConsiderationSigner::new(100)
        .sign_at(IDEAL, memo, 150, 0, PASSPHRASE, 1_700_000_000, 12345)
        .unwrap()
}

/// Neighbourhood of key 0 as the network would describe it
pub fn neighbourhood() -> String {
    format!(
        r#"digraph "neighbourhood" {{
            node [locale="en"];
            10 [pubkey="{KEY_0}", label="me", ranking=0.3];
            11 [pubkey="{KEY_1}", label="friend", ranking=0.8];
            12 [pubkey="{IDEAL}", label="ideal", ranking=0.05, locale="fr"];
            10 -> 11 [weight=1.5, height=100, time=1700000000];
            11 -> 12 [weight=0.5, height=101, time=1700000600];
            12 -> 10 [weight=0.1, height=102, time=1700001200];
        }}"#
    )
}
