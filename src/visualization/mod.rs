pub mod verletsim_vis2d;
