//! Factory assembling the complete causal model: domain graph,
//! Bayesian network, and oracle.

use std::sync::Arc;

use tracing::info;

use causeway_core::dataset::ObservationTable;
use causeway_core::errors::CausewayResult;

use crate::bayes::BayesianNetwork;
use crate::graph::{supply_chain, CausalGraph};
use crate::oracle::CausalOracle;

/// Build the supply-chain causal model. With data, CPDs are estimated
/// by maximum likelihood; without, the network starts from uniform
/// priors so it stays queryable (effects come out neutral).
pub fn build_supply_chain_model(
    data: Option<&ObservationTable>,
) -> CausewayResult<(Arc<CausalGraph>, CausalOracle)> {
    let graph = Arc::new(supply_chain::build_graph()?);
    info!(
        variables = graph.variable_count(),
        edges = graph.edge_count(),
        "built supply-chain causal DAG"
    );

    let mut network = BayesianNetwork::new(Arc::clone(&graph));
    match data {
        Some(table) => network.fit(table),
        None => {
            info!("no data provided, using prior knowledge for causal inference");
            network.fit_uniform();
        }
    }

    let oracle = CausalOracle::new(
        Arc::clone(&graph),
        network,
        supply_chain::default_oracle_config(),
    )?;
    Ok((graph, oracle))
}
