mod clustering_properties;
