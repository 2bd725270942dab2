pub mod match_sim;
